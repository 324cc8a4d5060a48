//! Wikipedia REST summary client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{EncyclopediaClient, PageSummary};
use crate::error::{Result, ToolError};

const USER_AGENT: &str = "ReAct Agent from Scratch";

#[derive(Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: String,
    #[serde(default, rename = "type")]
    kind: String,
}

/// HTTP client for `<lang>.wikipedia.org/api/rest_v1`
pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    /// Client for the given language edition, e.g. `"en"`
    pub fn new(language: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("https://{language}.wikipedia.org/api/rest_v1"),
        })
    }

    fn summary_url(&self, title: &str) -> String {
        let title = title.trim().replace(' ', "_");
        format!("{}/page/summary/{}", self.base_url, urlencoding::encode(&title))
    }
}

#[async_trait]
impl EncyclopediaClient for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        let response = self.client.get(self.summary_url(title)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let page: SummaryResponse = response.json().await?;
        if page.kind.ends_with("not_found") {
            return Ok(None);
        }
        Ok(Some(PageSummary {
            title: page.title,
            extract: page.extract,
        }))
    }

    fn name(&self) -> &str {
        "Wikipedia"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_encodes_title() {
        let client = WikipediaClient::new("en").unwrap();
        assert_eq!(
            client.summary_url(" Albert Einstein "),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Albert_Einstein"
        );
        assert_eq!(
            client.summary_url("C++"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/C%2B%2B"
        );
    }

    #[test]
    fn test_language_edition() {
        let client = WikipediaClient::new("es").unwrap();
        assert!(client.summary_url("Julián Álvarez").starts_with("https://es.wikipedia.org/"));
    }
}
