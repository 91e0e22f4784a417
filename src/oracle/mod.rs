pub mod decision;
pub mod openai;

pub use decision::{parse_decision, Decision};
pub use openai::OpenAiOracle;

use std::future::Future;
use std::pin::Pin;

/// The language-model text-completion service behind every reasoning,
/// classification and generation decision.
///
/// The contract is deliberately thin: free-text prompt in, free-text
/// completion out. Yes/no questions go through [`Oracle::decide`], which
/// keeps the locale-specific token parsing in one adapter
/// ([`decision::parse_decision`]) instead of scattering string matching
/// across callers.
pub trait Oracle: Send + Sync {
    /// Oracle identifier (e.g. "openai").
    fn name(&self) -> &str;

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

    /// Ask a yes/no question and parse the answer into a typed decision.
    fn decide<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Decision>> + Send + 'a>> {
        Box::pin(async move {
            let answer = self.complete(question).await?;
            Ok(parse_decision(&answer))
        })
    }
}
