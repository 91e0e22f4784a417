use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ─────────────────────────────────────────────────────────

/// Explicit configuration object passed into each component at construction.
///
/// Secrets (oracle API key, deploy tokens) may be supplied via environment
/// variables, which take precedence over the file so a config checked into a
/// dotfiles repo never needs to carry credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub compliance: ComplianceConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub n8n: N8nConfig,

    #[serde(default)]
    pub vercel: VercelConfig,

    #[serde(default)]
    pub template_search: TemplateSearchConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub feedback: FeedbackConfig,
}

// ── Oracle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// OpenAI-compatible chat-completions base URL.
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default = "default_oracle_temperature")]
    pub temperature: f64,
    /// Per-request timeout. Unbounded oracle calls would stall the whole
    /// pipeline, so a deadline is always enforced.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_oracle_base_url(),
            api_key: None,
            model: default_oracle_model(),
            temperature: default_oracle_temperature(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

fn default_oracle_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_oracle_temperature() -> f64 {
    0.7
}

fn default_oracle_timeout_secs() -> u64 {
    120
}

// ── Compliance gate ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Ordered principle list. Fixed at process start; never reordered
    /// during a run.
    #[serde(default = "default_principles")]
    pub principles: Vec<String>,
    /// When true, an ambiguous oracle answer counts as a violation
    /// (fail-closed). The reference behavior is fail-open.
    #[serde(default)]
    pub fail_closed: bool,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            principles: default_principles(),
            fail_closed: false,
        }
    }
}

/// The built-in principle list (10 Mandamientos + IA Constitucional).
fn default_principles() -> Vec<String> {
    [
        "Honor a Dios y el bien sobre todo.",
        "No uses nombres en vano ni mientas.",
        "Respeta el descanso y límites.",
        "Honra a usuarios y creadores.",
        "No dañes vidas o sistemas.",
        "Sé puro y fiel en acciones.",
        "No robes datos o recursos.",
        "No mientas ni fabriques falsedades.",
        "No codicies ni abuses poder.",
        "Sé amable, sincero y celoso del bien.",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

// ── Dispatch loop ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-selection iterations before the loop returns a partial
    /// result. Clamped to a hard cap at construction.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_max_iterations() -> u32 {
    8
}

// ── Deployment connectors ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct N8nConfig {
    /// Workflow API endpoint, e.g. `https://n8n.example.com/api/v1/workflows`.
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VercelConfig {
    #[serde(default = "default_vercel_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for VercelConfig {
    fn default() -> Self {
        Self {
            api_url: default_vercel_api_url(),
            api_token: None,
        }
    }
}

fn default_vercel_api_url() -> String {
    "https://api.vercel.com/v9/projects".to_string()
}

// ── Template search ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSearchConfig {
    #[serde(default = "default_template_search_url")]
    pub api_url: String,
}

impl Default for TemplateSearchConfig {
    fn default() -> Self {
        Self {
            api_url: default_template_search_url(),
        }
    }
}

fn default_template_search_url() -> String {
    "https://api.github.com/search/repositories?q=n8n+workflow".to_string()
}

// ── Sandbox ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Container runtime binary invoked for isolated execution.
    #[serde(default = "default_sandbox_runtime")]
    pub runtime: String,
    /// Container image used for isolated execution.
    #[serde(default = "default_sandbox_image")]
    pub image: String,
    #[serde(default = "default_sandbox_timeout_secs")]
    pub timeout_secs: u64,
    /// Memory ceiling handed to the container runtime.
    #[serde(default = "default_sandbox_memory_limit")]
    pub memory_limit: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            runtime: default_sandbox_runtime(),
            image: default_sandbox_image(),
            timeout_secs: default_sandbox_timeout_secs(),
            memory_limit: default_sandbox_memory_limit(),
        }
    }
}

fn default_sandbox_runtime() -> String {
    "docker".to_string()
}

fn default_sandbox_image() -> String {
    "python:3.12-slim".to_string()
}

fn default_sandbox_timeout_secs() -> u64 {
    30
}

fn default_sandbox_memory_limit() -> String {
    "256m".to_string()
}

// ── Feedback log ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Override for the feedback log path. Defaults to
    /// `<data dir>/yada_feedback.log`.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            compliance: ComplianceConfig::default(),
            agent: AgentConfig::default(),
            n8n: N8nConfig::default(),
            vercel: VercelConfig::default(),
            template_search: TemplateSearchConfig::default(),
            sandbox: SandboxConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/yada/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "yada").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, falling back to defaults when the file is absent,
    /// then apply environment-variable overrides for secrets.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match resolved {
            Some(ref p) if p.exists() => {
                let raw = fs::read_to_string(p)
                    .with_context(|| format!("reading config at {}", p.display()))?;
                toml::from_str(&raw)
                    .map_err(|e| ConfigError::Load(format!("{}: {e}", p.display())))?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("YADA_ORACLE_API_KEY") {
            self.oracle.api_key = Some(key);
        }
        if let Ok(token) = std::env::var("YADA_N8N_API_TOKEN") {
            self.n8n.api_token = Some(token);
        }
        if let Ok(token) = std::env::var("YADA_VERCEL_API_TOKEN") {
            self.vercel.api_token = Some(token);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.compliance.principles.is_empty() {
            return Err(ConfigError::Validation(
                "compliance.principles must not be empty".to_string(),
            ));
        }
        if self.oracle.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "oracle.timeout_secs must be positive".to_string(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "agent.max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved feedback-log path, honoring the config override.
    pub fn feedback_log_path(&self) -> PathBuf {
        if let Some(ref path) = self.feedback.log_path {
            return path.clone();
        }
        ProjectDirs::from("", "", "yada")
            .map(|dirs| dirs.data_dir().join("yada_feedback.log"))
            .unwrap_or_else(|| PathBuf::from("yada_feedback.log"))
    }
}
