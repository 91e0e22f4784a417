use crate::config::ComplianceConfig;
use crate::oracle::{Decision, Oracle};
use std::sync::Arc;

/// Outcome of screening a task against the ordered principle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Rejected {
        /// The principle whose check fired.
        principle: String,
        /// Human-readable remediation hint returned to the caller.
        remediation: String,
    },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

/// Ordered-policy check run before any task execution.
///
/// Principles are evaluated strictly in list order and evaluation stops at
/// the first violation; a rejected task never reaches the dispatch loop.
pub struct ComplianceGate {
    oracle: Arc<dyn Oracle>,
    principles: Vec<String>,
    /// Whether an ambiguous oracle answer counts as a violation. The
    /// reference behavior is fail-open (false): only a clear affirmative
    /// rejects. Flipping this tightens the safety posture at the cost of
    /// rejecting tasks on malformed answers.
    fail_closed: bool,
}

impl ComplianceGate {
    pub fn new(oracle: Arc<dyn Oracle>, config: &ComplianceConfig) -> Self {
        Self {
            oracle,
            principles: config.principles.clone(),
            fail_closed: config.fail_closed,
        }
    }

    /// Screen `task` against every principle in order, short-circuiting on
    /// the first violation.
    pub async fn evaluate(&self, task: &str) -> anyhow::Result<Verdict> {
        for principle in &self.principles {
            let question = format!("¿Viola '{task}' el principio '{principle}'? Responde sí/no.");
            let decision = self.oracle.decide(&question).await?;

            let violated = match decision {
                Decision::Affirmative => true,
                Decision::Negative => false,
                Decision::Ambiguous => {
                    tracing::warn!(
                        principle = %principle,
                        fail_closed = self.fail_closed,
                        "ambiguous compliance answer"
                    );
                    self.fail_closed
                }
            };

            if violated {
                tracing::info!(principle = %principle, "task rejected by compliance gate");
                return Ok(Verdict::Rejected {
                    principle: principle.clone(),
                    remediation:
                        "Rechazado: Viola ética. Reformula para alinearte con el bien.".to_string(),
                });
            }
        }

        tracing::debug!(principles = self.principles.len(), "task allowed");
        Ok(Verdict::Allowed)
    }
}
