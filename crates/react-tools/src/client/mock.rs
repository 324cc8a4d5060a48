//! Mock Clients
//!
//! In-memory backends for tests and offline demos. Both record the queries
//! they receive.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{EncyclopediaClient, PageSummary, SearchClient, SearchHit};
use crate::error::{Result, ToolError};

/// Search backend returning a fixed hit list
#[derive(Default)]
pub struct MockSearchClient {
    hits: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl MockSearchClient {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Backend whose every search fails with an upstream error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.queries.lock().await.push(query.to_string());
        if self.fail {
            return Err(ToolError::Upstream {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

/// Encyclopedia backend over a title -> extract map
#[derive(Default)]
pub struct MockEncyclopediaClient {
    pages: HashMap<String, String>,
    queries: Mutex<Vec<String>>,
}

impl MockEncyclopediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, title: impl Into<String>, extract: impl Into<String>) -> Self {
        self.pages.insert(title.into(), extract.into());
        self
    }

    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl EncyclopediaClient for MockEncyclopediaClient {
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        self.queries.lock().await.push(title.to_string());
        Ok(self
            .pages
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(title.trim()))
            .map(|(t, extract)| PageSummary {
                title: t.clone(),
                extract: extract.clone(),
            }))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
