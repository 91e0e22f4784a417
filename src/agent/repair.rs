use crate::oracle::Oracle;
use std::sync::Arc;

/// Outcome of the post-loop critique pass.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// The candidate, corrected if the analysis asked for it.
    pub text: String,
    /// The raw critique, logged as feedback signal.
    pub analysis: String,
    pub repaired: bool,
}

/// Single self-critique/repair pass over a candidate response.
///
/// One analysis call; if it signals a need for repair, exactly one
/// correction call replaces the candidate. Never recursive: the corrected
/// text is not re-analyzed.
pub struct RepairPass {
    oracle: Arc<dyn Oracle>,
}

impl RepairPass {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn run(&self, candidate: &str) -> anyhow::Result<RepairOutcome> {
        let analysis = self
            .oracle
            .complete(&format!(
                "Analiza '{candidate}' para errores o mejoras. ¿Necesita repair?"
            ))
            .await?;

        if !needs_repair(&analysis) {
            return Ok(RepairOutcome {
                text: candidate.to_string(),
                analysis,
                repaired: false,
            });
        }

        tracing::debug!("repair pass triggered");
        let repaired = self
            .oracle
            .complete(&format!("Repara: {candidate} basado en {analysis}"))
            .await?;

        Ok(RepairOutcome {
            text: repaired,
            analysis,
            repaired: true,
        })
    }
}

/// Textual affirmative signal in a free-form critique.
///
/// Substring match on the accented "sí" (plus an English fallback): the
/// unaccented "si" would false-positive on ordinary Spanish words.
fn needs_repair(analysis: &str) -> bool {
    let lower = analysis.to_lowercase();
    lower.contains("sí") || lower.contains("yes")
}
