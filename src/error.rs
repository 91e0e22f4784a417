use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `yada`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
///
/// A compliance rejection is deliberately *not* an error: it is a terminal,
/// user-facing verdict modeled by [`crate::compliance::Verdict`].
#[derive(Debug, Error)]
pub enum YadaError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Oracle ──────────────────────────────────────────────────────────
    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),

    // ── Tools ───────────────────────────────────────────────────────────
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // ── Sandbox ─────────────────────────────────────────────────────────
    #[error("sandbox: {0}")]
    Sandbox(#[from] SandboxError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Oracle errors ───────────────────────────────────────────────────────────

/// Failures of the language-model completion service. Fatal to the current
/// task submission: neither the compliance gate nor the dispatch loop can
/// make progress without the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("authentication failed")]
    Auth,

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("empty completion in response")]
    EmptyCompletion,
}

// ─── Tool errors ─────────────────────────────────────────────────────────────

/// Tool-boundary failures. The registry renders these as failed
/// [`crate::tools::ToolResult`]s rather than aborting the run; connector
/// failures stay deterministic observation text and never reach this enum.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),
}

// ─── Sandbox errors ──────────────────────────────────────────────────────────

/// Sandbox failures, rendered as descriptive text observations by the
/// executor.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("execution timed out after {0}s")]
    Timeout(u64),
}
