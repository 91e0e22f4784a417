use super::traits::{Tool, ToolResult};
use crate::config::{N8nConfig, VercelConfig};
use reqwest::Client;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const N8N_SUCCESS_TEXT: &str = "Deploy exitoso";
const N8N_FAILURE_TEXT: &str = "Error en deploy.";
const VERCEL_SUCCESS_TEXT: &str = "Deploy exitoso a Vercel";
const VERCEL_FAILURE_TEXT: &str = "Error en deploy.";

fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

// ── n8n connector ────────────────────────────────────────────────────────────

/// Posts a workflow JSON document to an n8n instance.
///
/// Success is strictly HTTP 200; any other response, including a network
/// failure, is a deterministic failure text. No retry is performed here —
/// retries, if desired, belong to the caller.
pub struct N8nDeployTool {
    api_url: String,
    auth_header: Option<String>,
    client: Client,
}

impl N8nDeployTool {
    pub fn new(config: &N8nConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            auth_header: config.api_token.as_deref().map(|t| format!("Bearer {t}")),
            client: http_client(),
        }
    }

    async fn deploy(&self, workflow_json: &str) -> ToolResult {
        if self.api_url.is_empty() {
            return ToolResult::fail("n8n api_url is not configured");
        }

        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .body(workflow_json.to_string());
        if let Some(ref auth) = self.auth_header {
            builder = builder.header("Authorization", auth);
        }

        match builder.send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                tracing::info!("n8n deploy succeeded");
                ToolResult::ok(N8N_SUCCESS_TEXT)
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "n8n deploy failed");
                ToolResult::ok(N8N_FAILURE_TEXT)
            }
            Err(e) => {
                tracing::warn!(error = %e, "n8n deploy request failed");
                ToolResult::ok(N8N_FAILURE_TEXT)
            }
        }
    }
}

impl Tool for N8nDeployTool {
    fn name(&self) -> &str {
        "deploy_to_n8n"
    }

    fn description(&self) -> &str {
        "Despliega workflow en n8n"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move { Ok(self.deploy(input).await) })
    }
}

// ── Vercel connector ─────────────────────────────────────────────────────────

/// Posts generated static web assets to Vercel as a new project.
///
/// Payload shape: `{name, files: [{file, data}]}`. Success is strictly
/// HTTP 200 as the reference behaves; the live API may answer 201 for
/// resource creation.
pub struct VercelDeployTool {
    api_url: String,
    auth_header: Option<String>,
    project_name: String,
    client: Client,
}

impl VercelDeployTool {
    pub fn new(config: &VercelConfig, project_name: impl Into<String>) -> Self {
        Self {
            api_url: config.api_url.clone(),
            auth_header: config.api_token.as_deref().map(|t| format!("Bearer {t}")),
            project_name: project_name.into(),
            client: http_client(),
        }
    }

    async fn deploy(&self, code: &str) -> ToolResult {
        let payload = json!({
            "name": self.project_name,
            "files": [{"file": "index.html", "data": code}],
        });

        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(ref auth) = self.auth_header {
            builder = builder.header("Authorization", auth);
        }

        match builder.send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                tracing::info!(project = %self.project_name, "vercel deploy succeeded");
                ToolResult::ok(VERCEL_SUCCESS_TEXT)
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "vercel deploy failed");
                ToolResult::ok(VERCEL_FAILURE_TEXT)
            }
            Err(e) => {
                tracing::warn!(error = %e, "vercel deploy request failed");
                ToolResult::ok(VERCEL_FAILURE_TEXT)
            }
        }
    }
}

impl Tool for VercelDeployTool {
    fn name(&self) -> &str {
        "deploy_to_vercel"
    }

    fn description(&self) -> &str {
        "Despliega código web en Vercel"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move { Ok(self.deploy(input).await) })
    }
}
