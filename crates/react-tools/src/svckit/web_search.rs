//! Web Search Tool
//!
//! Queries a search backend and returns the top hits as structured data.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{Tool, ToolResult};

use crate::client::SearchClient;
use crate::error::ToolError;

/// Number of hits handed back to the model
pub const MAX_RESULTS: usize = 2;

/// Tool for searching the web
pub struct WebSearchTool {
    client: Arc<dyn SearchClient>,
}

impl WebSearchTool {
    pub const NAME: &'static str = "web_search";

    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    fn error(message: impl Into<String>) -> ToolResult {
        ToolResult::structured(json!([{ "error": message.into() }])).with_success(false)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search the web for information. Input is a query. e.g. 'Champion of the 2024 Champions League'."
    }

    async fn run(&self, query: &str) -> ToolResult {
        let query = query.trim();
        if query.is_empty() {
            return Self::error(ToolError::EmptyQuery.to_string());
        }

        match self.client.search(query, MAX_RESULTS).await {
            Ok(hits) if hits.is_empty() => Self::error("No results found."),
            Ok(hits) => serde_json::to_value(&hits).map_or_else(
                |e| Self::error(format!("Search request failed: {e}")),
                ToolResult::structured,
            ),
            Err(e) => {
                tracing::warn!(backend = self.client.name(), error = %e, "web search failed");
                Self::error(format!("Search request failed: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockSearchClient, SearchHit};

    fn hit(n: u32) -> SearchHit {
        SearchHit {
            title: format!("Result {n}"),
            content: format!("Content {n}"),
            url: format!("https://example.org/{n}"),
            score: 0.5,
        }
    }

    #[tokio::test]
    async fn test_returns_top_hits() {
        let client = Arc::new(MockSearchClient::new(vec![hit(1), hit(2), hit(3)]));
        let tool = WebSearchTool::new(client.clone());

        let result = tool.run("  F1 winner 2024 ").await;
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data.as_array().unwrap().len(), MAX_RESULTS);
        assert_eq!(data[0]["title"], "Result 1");
        assert_eq!(data[1]["url"], "https://example.org/2");
        assert_eq!(client.queries().await, vec!["F1 winner 2024"]);
    }

    #[tokio::test]
    async fn test_empty_query() {
        let client = Arc::new(MockSearchClient::new(vec![hit(1)]));
        let tool = WebSearchTool::new(client.clone());

        let result = tool.run("   ").await;
        assert!(!result.success);
        assert_eq!(result.to_string(), r#"[{"error":"Query cannot be empty."}]"#);
        assert!(client.queries().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_hits() {
        let tool = WebSearchTool::new(Arc::new(MockSearchClient::new(Vec::new())));
        let result = tool.run("nothing").await;
        assert_eq!(result.data.unwrap()[0]["error"], "No results found.");
    }

    #[tokio::test]
    async fn test_backend_failure_is_data() {
        let tool = WebSearchTool::new(Arc::new(MockSearchClient::failing()));
        let result = tool.run("anything").await;
        assert!(!result.success);
        let message = result.data.unwrap()[0]["error"].as_str().unwrap().to_string();
        assert!(message.starts_with("Search request failed:"));
    }
}
