use crate::oracle::Oracle;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Upper bound on the content prefix sent to the oracle for assessment.
/// Bounds cost and latency; the fingerprint always covers the full content.
const ASSESSMENT_PREFIX_CHARS: usize = 1000;

/// Fingerprint plus vulnerability assessment for one piece of content.
///
/// Computed fresh per audit call and never cached across different content.
#[derive(Debug, Clone)]
pub struct SecurityReport {
    /// SHA-256 hex digest of the full content.
    pub fingerprint: String,
    /// Oracle assessment against the OWASP Top 10 taxonomy.
    pub assessment: String,
}

impl SecurityReport {
    pub fn render(&self) -> String {
        format!(
            "Hash: {}\nVulnerabilidades: {}",
            self.fingerprint, self.assessment
        )
    }
}

/// Audits generated content: deterministic fingerprint + oracle-backed
/// vulnerability assessment.
pub struct SecurityAuditor {
    oracle: Arc<dyn Oracle>,
}

impl SecurityAuditor {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub async fn audit(&self, content: &str) -> anyhow::Result<SecurityReport> {
        let fingerprint = fingerprint(content);
        let prefix = bounded_prefix(content, ASSESSMENT_PREFIX_CHARS);
        let prompt = format!(
            "Analiza código para vulnerabilidades OWASP Top 10: {prefix}. Reporta riesgos."
        );
        let assessment = self.oracle.complete(&prompt).await?;

        Ok(SecurityReport {
            fingerprint,
            assessment,
        })
    }
}

/// SHA-256 hex digest. Same bytes in, same digest out.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn bounded_prefix(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
