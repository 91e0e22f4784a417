use super::traits::{Tool, ToolResult};
use crate::sandbox::SandboxExecutor;
use std::future::Future;
use std::pin::Pin;

/// Exposes isolated code execution to the dispatch loop.
///
/// Always resolves to a successful `ToolResult` whose output carries either
/// the captured program output or the executor's failure text; sandbox
/// failures are observations for the loop, never run-fatal.
pub struct SandboxTool {
    executor: SandboxExecutor,
}

impl SandboxTool {
    pub fn new(executor: SandboxExecutor) -> Self {
        Self { executor }
    }
}

impl Tool for SandboxTool {
    fn name(&self) -> &str {
        "run_in_sandbox"
    }

    fn description(&self) -> &str {
        "Ejecuta código en un sandbox aislado"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move { Ok(ToolResult::ok(self.executor.execute(input).await)) })
    }
}
