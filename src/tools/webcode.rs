use super::traits::{Tool, ToolResult};
use crate::oracle::Oracle;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Generates HTML/CSS/JS for a web-design request.
pub struct WebCodeGeneratorTool {
    oracle: Arc<dyn Oracle>,
}

impl WebCodeGeneratorTool {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

impl Tool for WebCodeGeneratorTool {
    fn name(&self) -> &str {
        "generate_web_code"
    }

    fn description(&self) -> &str {
        "Genera código web HTML/CSS/JS"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move {
            let prompt = format!(
                "Crea código HTML/CSS/JS para {input}. Usa Bootstrap 5.3 y sigue prácticas \
                 seguras."
            );
            let code = self.oracle.complete(&prompt).await?;
            Ok(ToolResult::ok(code))
        })
    }
}
