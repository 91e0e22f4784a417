use super::traits::{Tool, ToolResult};
use crate::audit::SecurityAuditor;
use std::future::Future;
use std::pin::Pin;

/// Exposes the security auditor to the dispatch loop.
pub struct SecurityAuditTool {
    auditor: SecurityAuditor,
}

impl SecurityAuditTool {
    pub fn new(auditor: SecurityAuditor) -> Self {
        Self { auditor }
    }
}

impl Tool for SecurityAuditTool {
    fn name(&self) -> &str {
        "check_security"
    }

    fn description(&self) -> &str {
        "Verifica seguridad del código"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move {
            let report = self.auditor.audit(input).await?;
            Ok(ToolResult::ok(report.render()))
        })
    }
}
