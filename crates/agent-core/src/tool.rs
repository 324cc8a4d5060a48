//! Tool System
//!
//! Uniform capability contract for everything the model can invoke through
//! an `Action:` line. Tools are registered explicitly at startup and looked
//! up by lowercase name by the reasoning loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Result from tool execution
///
/// A tool never fails past its own boundary: failures are carried as
/// `success == false` with an `"Error: ..."` text, or as structured data
/// holding an `error` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether execution succeeded
    pub success: bool,

    /// Text output (success value or error message)
    pub output: String,

    /// Structured data (if applicable); takes precedence over `output` when rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            data: None,
        }
    }

    /// Failure result; the text is prefixed with `Error: `
    pub fn failure(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            output: format!("Error: {reason}"),
            data: None,
        }
    }

    pub fn structured(data: serde_json::Value) -> Self {
        Self {
            success: true,
            output: String::new(),
            data: Some(data),
        }
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{data}"),
            None => f.write_str(&self.output),
        }
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool identifier as the model writes it in an `Action:` line
    fn name(&self) -> &str;

    /// Human-readable description (shown to the LLM)
    fn description(&self) -> &str;

    /// Run the tool on the raw argument text
    async fn run(&self, query: &str) -> ToolResult;
}

/// Registry for available tools
///
/// Keys are lowercase names. Registering a name that already exists replaces
/// the earlier tool but keeps its position in the catalog, so the catalog
/// order is the order in which names were first registered.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let key = tool.name().to_lowercase();
        if let Some(&slot) = self.index.get(&key) {
            tracing::warn!(tool = %key, "replacing previously registered tool");
            self.tools[slot] = tool;
        } else {
            self.index.insert(key, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name (case-insensitive)
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// One `"<name>: <description>"` line per tool, in catalog order
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get tool names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
