use super::dispatch::{DispatchLoop, DispatchResult};
use super::repair::RepairPass;
use crate::audit::{SecurityAuditor, SecurityReport};
use crate::compliance::{ComplianceGate, Verdict};
use crate::config::Config;
use crate::feedback::FeedbackLog;
use crate::oracle::Oracle;
use crate::tools;
use std::sync::Arc;

/// Final composed result of one task submission.
#[derive(Debug)]
pub struct RunResult {
    pub text: String,
    /// Set when the compliance gate stopped the task before any tool ran.
    pub rejected: bool,
    /// Present when the task mentioned code/workflow and the output was
    /// audited.
    pub security_report: Option<SecurityReport>,
}

/// Orchestrates one task submission end to end:
/// compliance gate → dispatch loop → repair pass → feedback log →
/// keyword-triggered security audit → composed result.
pub struct Agent {
    oracle: Arc<dyn Oracle>,
    gate: ComplianceGate,
    dispatch: DispatchLoop,
    repair: RepairPass,
    auditor: SecurityAuditor,
    feedback: FeedbackLog,
}

impl Agent {
    pub fn new(oracle: Arc<dyn Oracle>, config: &Config) -> Self {
        let registry = Arc::new(tools::build_registry(oracle.clone(), config));
        Self {
            gate: ComplianceGate::new(oracle.clone(), &config.compliance),
            dispatch: DispatchLoop::new(registry, config.agent.max_iterations),
            repair: RepairPass::new(oracle.clone()),
            auditor: SecurityAuditor::new(oracle.clone()),
            feedback: FeedbackLog::new(config.feedback_log_path()),
            oracle,
        }
    }

    /// Submit one task. The task string is immutable for the whole run.
    ///
    /// Oracle failures are fatal to this submission and surface as `Err`;
    /// everything at the tool boundary is already folded into the composed
    /// text by the layers below.
    pub async fn run(&self, task: &str) -> anyhow::Result<RunResult> {
        tracing::info!(task = %task, "task submitted");

        match self.gate.evaluate(task).await? {
            Verdict::Allowed => {}
            Verdict::Rejected { remediation, .. } => {
                return Ok(RunResult {
                    text: remediation,
                    rejected: true,
                    security_report: None,
                });
            }
        }

        let DispatchResult { final_text, .. } = self
            .dispatch
            .run(self.oracle.as_ref(), &format!("¡Gran idea! Procesando: {task}"))
            .await?;

        let outcome = self.repair.run(&final_text).await?;

        if let Err(e) = self
            .feedback
            .append(&format!("Feedback: {}", outcome.analysis))
            .await
        {
            // Feedback is advisory signal; losing an entry must not fail the
            // submission.
            tracing::warn!(error = %e, "feedback append failed");
        }

        let mut text = outcome.text;
        let mut security_report = None;
        if mentions_auditable_artifact(task) {
            let report = self.auditor.audit(&text).await?;
            text.push_str(&format!("\nSecurity Report: {}", report.render()));
            security_report = Some(report);
        }

        Ok(RunResult {
            text: format!("¡Listo! {text}"),
            rejected: false,
            security_report,
        })
    }
}

/// Keyword rule for the post-run audit: literal "code" or "workflow" in the
/// task text, case-insensitive.
fn mentions_auditable_artifact(task: &str) -> bool {
    let lower = task.to_lowercase();
    lower.contains("code") || lower.contains("workflow")
}
