use super::traits::{Tool, ToolResult};
use crate::oracle::Oracle;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Oracle-backed deep dive on a topic.
pub struct ResearchTool {
    oracle: Arc<dyn Oracle>,
}

impl ResearchTool {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

impl Tool for ResearchTool {
    fn name(&self) -> &str {
        "research_topic"
    }

    fn description(&self) -> &str {
        "Investiga un tema"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move {
            let prompt = format!("Investiga profundamente {input}. Resume las mejores formas.");
            let summary = self.oracle.complete(&prompt).await?;
            Ok(ToolResult::ok(summary))
        })
    }
}
