use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Render the result as observation text for the dispatch loop.
    /// Failures are surfaced inline, not suppressed.
    pub fn observation(&self) -> String {
        match self.error {
            Some(ref error) => format!("[ERROR] {error}"),
            None => self.output.clone(),
        }
    }
}

/// Core tool trait — implement for any capability.
///
/// Tools take a single free-text input and always come back with a
/// [`ToolResult`]; external failures (network, non-success status, sandbox
/// errors) belong in a failed result, not in the `Err` channel, so the
/// dispatch loop can keep reasoning over them as observations.
pub trait Tool: Send + Sync {
    /// Tool name (used by the reasoning loop to select an action).
    fn name(&self) -> &str;

    /// Capability description shown to the oracle.
    fn description(&self) -> &str;

    /// Execute the tool with the given free-text input.
    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_renders_output_on_success() {
        let result = ToolResult::ok("file1.txt\nfile2.txt");
        assert_eq!(result.observation(), "file1.txt\nfile2.txt");
    }

    #[test]
    fn observation_renders_error_on_failure() {
        let result = ToolResult::fail("connection refused");
        assert_eq!(result.observation(), "[ERROR] connection refused");
    }

    #[test]
    fn tool_result_serde_round_trip() {
        let result = ToolResult::ok("done");
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ToolResult = serde_json::from_str(&json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.output, "done");
        assert!(parsed.error.is_none());
    }
}
