//! # react-tools
//!
//! Tools the ReAct agent can call from an `Action:` line.
//!
//! | Tool         | Input                                              | Backend          |
//! |--------------|----------------------------------------------------|------------------|
//! | `calculator` | `{"operation": "add", "params": {"a": 5, "b": 3}}` | local            |
//! | `wikipedia`  | page title                                         | Wikipedia REST   |
//! | `web_search` | free-text query                                    | Tavily           |
//!
//! Network-backed tools sit behind the client traits in [`client`], so tests
//! and offline runs can swap in the mock backends.

pub mod client;
pub mod error;
pub mod svckit;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use error::{Result, ToolError};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{CalculatorTool, Operation, WebSearchTool, WikipediaTool};
}

use client::{TavilyClient, WikipediaClient};
use tools::{CalculatorTool, WebSearchTool, WikipediaTool};

/// Language edition used by the default Wikipedia tool
pub const WIKIPEDIA_LANGUAGE: &str = "en";

/// Build the standard registry: `calculator`, `wikipedia`, then
/// `web_search` when a Tavily key is given.
pub fn default_registry(tavily_api_key: Option<&str>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(CalculatorTool);
    registry.register(WikipediaTool::new(Arc::new(WikipediaClient::new(
        WIKIPEDIA_LANGUAGE,
    )?)));

    match tavily_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => {
            registry.register(WebSearchTool::new(Arc::new(TavilyClient::new(key)?)));
        }
        None => tracing::info!("TAVILY_API_KEY not set; web_search disabled"),
    }

    tracing::debug!(tools = ?registry.names(), "tool registry ready");
    Ok(registry)
}
