//! Tavily search API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SearchClient, SearchHit};
use crate::error::{Result, ToolError};

const SEARCH_URL: &str = "https://api.tavily.com/search";

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
    #[serde(default)]
    score: f64,
}

impl From<RawHit> for SearchHit {
    fn from(raw: RawHit) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| "No title available".into()),
            content: raw.content.unwrap_or_else(|| "No content available".into()),
            url: raw.url.unwrap_or_else(|| "No URL available".into()),
            score: raw.score,
        }
    }
}

/// HTTP client for `api.tavily.com`
pub struct TavilyClient {
    client: Client,
    api_key: String,
    url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ToolError::Config(
                "Missing API Key: please set TAVILY_API_KEY".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            url: SEARCH_URL.to_string(),
        })
    }

    /// Point the client at another search endpoint
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest { query, max_results })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        tracing::debug!(query, hits = parsed.results.len(), "tavily search");
        Ok(parsed.results.into_iter().map(SearchHit::from).collect())
    }

    fn name(&self) -> &str {
        "Tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_rejected() {
        assert!(matches!(TavilyClient::new("  "), Err(ToolError::Config(_))));
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"results":[{"url":"https://example.org","score":0.9}]}"#).unwrap();
        let hit = SearchHit::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(hit.title, "No title available");
        assert_eq!(hit.content, "No content available");
        assert_eq!(hit.url, "https://example.org");
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(SearchRequest { query: "rust", max_results: 2 }).unwrap();
        assert_eq!(body, serde_json::json!({"query": "rust", "max_results": 2}));
    }
}
