//! External Service Clients
//!
//! Abstractions over the web search and encyclopedia backends the tools
//! query. Each has one HTTP implementation and one in-memory mock.

mod mock;
mod tavily;
mod wikipedia_api;

pub use mock::{MockEncyclopediaClient, MockSearchClient};
pub use tavily::TavilyClient;
pub use wikipedia_api::WikipediaClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One web search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub content: String,
    pub url: String,
    pub score: f64,
}

/// Summary of an encyclopedia page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub extract: String,
}

/// Web search backend (Strategy pattern)
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a search, returning at most `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Backend name
    fn name(&self) -> &str;
}

/// Encyclopedia backend
#[async_trait]
pub trait EncyclopediaClient: Send + Sync {
    /// Fetch the summary of a page; `None` when no such page exists
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>>;

    /// Backend name
    fn name(&self) -> &str;
}
