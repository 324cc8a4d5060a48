//! Wikipedia Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{Tool, ToolResult};

use crate::client::EncyclopediaClient;
use crate::error::ToolError;

/// Tool for fetching encyclopedia summaries
pub struct WikipediaTool {
    client: Arc<dyn EncyclopediaClient>,
}

impl WikipediaTool {
    pub const NAME: &'static str = "wikipedia";

    pub fn new(client: Arc<dyn EncyclopediaClient>) -> Self {
        Self { client }
    }

    fn error(message: impl Into<String>) -> ToolResult {
        ToolResult::structured(json!({ "error": message.into() })).with_success(false)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Gets information from a Wikipedia entry. Specific Wikipedia input. e.g. 'Albert Einstein'."
    }

    async fn run(&self, query: &str) -> ToolResult {
        if query.trim().is_empty() {
            return Self::error(ToolError::EmptyQuery.to_string());
        }

        match self.client.summary(query).await {
            Ok(Some(page)) => ToolResult::structured(json!({
                "query": query,
                "title": page.title,
                "summary": page.extract,
            })),
            Ok(None) => Self::error(format!("No Wikipedia page found for '{query}'.")),
            Err(e) => {
                tracing::warn!(backend = self.client.name(), error = %e, "wikipedia lookup failed");
                Self::error(format!("An error occurred while searching Wikipedia: {e}"))
            }
        }
    }
}
