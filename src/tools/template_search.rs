use super::traits::{Tool, ToolResult};
use crate::config::TemplateSearchConfig;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Maximum number of result URLs returned per search.
const MAX_RESULTS: usize = 3;

const NOT_FOUND_TEXT: &str = "No se encontraron plantillas.";

/// Searches a repository index (GitHub search API shape) for n8n workflow
/// templates.
pub struct TemplateSearchTool {
    api_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    html_url: String,
}

impl TemplateSearchTool {
    pub fn new(config: &TemplateSearchConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn search(&self, query: &str) -> ToolResult {
        let separator = if self.api_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}q={}", self.api_url, separator, query);

        let response = match self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::fail(format!("template search failed: {e}")),
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "template search miss");
            return ToolResult::ok(NOT_FOUND_TEXT);
        }

        match response.json::<SearchResponse>().await {
            Ok(parsed) if !parsed.items.is_empty() => {
                let urls: Vec<String> = parsed
                    .items
                    .into_iter()
                    .take(MAX_RESULTS)
                    .map(|item| item.html_url)
                    .collect();
                ToolResult::ok(urls.join("\n"))
            }
            Ok(_) => ToolResult::ok(NOT_FOUND_TEXT),
            Err(e) => ToolResult::fail(format!("malformed search response: {e}")),
        }
    }
}

impl Tool for TemplateSearchTool {
    fn name(&self) -> &str {
        "search_n8n_templates"
    }

    fn description(&self) -> &str {
        "Busca plantillas n8n en GitHub"
    }

    fn execute<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResult>> + Send + 'a>> {
        Box::pin(async move { Ok(self.search(input).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer) -> TemplateSearchTool {
        TemplateSearchTool::new(&TemplateSearchConfig {
            api_url: format!("{}/search/repositories", server.uri()),
        })
    }

    #[tokio::test]
    async fn returns_at_most_three_urls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"html_url": "https://github.com/a/one"},
                    {"html_url": "https://github.com/b/two"},
                    {"html_url": "https://github.com/c/three"},
                    {"html_url": "https://github.com/d/four"}
                ]
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server).execute("email").await.unwrap();
        assert!(result.success);
        let urls: Vec<&str> = result.output.lines().collect();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "https://github.com/a/one");
    }

    #[tokio::test]
    async fn non_success_status_yields_not_found_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = tool_for(&server).execute("email").await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, NOT_FOUND_TEXT);
    }

    #[tokio::test]
    async fn empty_items_yields_not_found_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let result = tool_for(&server).execute("email").await.unwrap();
        assert_eq!(result.output, NOT_FOUND_TEXT);
    }

    #[tokio::test]
    async fn appends_query_to_preconfigured_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "n8n+workflow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let tool = TemplateSearchTool::new(&TemplateSearchConfig {
            api_url: format!("{}/search/repositories?q=n8n+workflow", server.uri()),
        });
        // The configured URL already carries a query string; the search
        // parameter must be appended with '&', not a second '?'.
        let result = tool.execute("email").await.unwrap();
        assert!(result.success);
    }
}
