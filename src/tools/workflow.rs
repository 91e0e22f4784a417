use super::traits::{Tool, ToolResult};
use crate::oracle::Oracle;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Generates an n8n workflow definition (JSON) for a free-text request.
pub struct WorkflowGeneratorTool {
    oracle: Arc<dyn Oracle>,
}

impl WorkflowGeneratorTool {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }
}

impl Tool for WorkflowGeneratorTool {
    fn name(&self) -> &str {
        "generate_n8n_workflow"
    }

    fn description(&self) -> &str {
        "Genera un workflow para n8n"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move {
            let prompt = format!(
                "Crea un JSON válido para n8n workflow que {input}. Usa nodos como trigger, \
                 actions, y connections. Asegura seguridad."
            );
            let workflow = self.oracle.complete(&prompt).await?;
            Ok(ToolResult::ok(workflow))
        })
    }
}
