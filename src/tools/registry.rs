use super::traits::{Tool, ToolResult};
use crate::error::ToolError;
use std::collections::HashMap;
use std::sync::Arc;

/// Central registry for tool instances.
///
/// Names are unique and stable for the life of a run; registering a tool
/// under an existing name replaces it.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let tool: Arc<dyn Tool> = Arc::from(tool);
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Return sorted list of registered tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// One `name: description` line per tool, sorted by name, for the
    /// reasoning prompt.
    pub fn describe(&self) -> String {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|tool| (tool.name(), tool.description()))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
            .iter()
            .map(|(name, description)| format!("- {name}: {description}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name.
    ///
    /// An unknown tool or a tool-level error comes back as a failed
    /// [`ToolResult`]; the dispatch loop treats it as a normal observation.
    pub async fn execute(&self, name: &str, input: &str) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            return ToolResult::fail(ToolError::NotFound(name.to_string()).to_string());
        };

        tracing::debug!(tool = name, "dispatching tool");
        match tool.execute(input).await {
            Ok(result) => result,
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }
}
