pub mod audit;
pub mod deploy;
pub mod registry;
pub mod research;
pub mod sandbox;
pub mod template_search;
pub mod traits;
pub mod webcode;
pub mod workflow;

pub use registry::ToolRegistry;
pub use traits::{Tool, ToolResult};

use crate::audit::SecurityAuditor;
use crate::config::Config;
use crate::oracle::Oracle;
use crate::sandbox::SandboxExecutor;
use std::sync::Arc;

/// Default Vercel project name used when a task does not name one.
const DEFAULT_PROJECT_NAME: &str = "yada-site";

/// Build the full tool set for one agent instance.
pub fn build_registry(oracle: Arc<dyn Oracle>, config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(workflow::WorkflowGeneratorTool::new(
        oracle.clone(),
    )));
    registry.register(Box::new(webcode::WebCodeGeneratorTool::new(oracle.clone())));
    registry.register(Box::new(research::ResearchTool::new(oracle.clone())));
    registry.register(Box::new(template_search::TemplateSearchTool::new(
        &config.template_search,
    )));
    registry.register(Box::new(deploy::N8nDeployTool::new(&config.n8n)));
    registry.register(Box::new(deploy::VercelDeployTool::new(
        &config.vercel,
        DEFAULT_PROJECT_NAME,
    )));
    registry.register(Box::new(audit::SecurityAuditTool::new(
        SecurityAuditor::new(oracle),
    )));
    registry.register(Box::new(sandbox::SandboxTool::new(SandboxExecutor::new(
        &config.sandbox,
    ))));
    registry
}
