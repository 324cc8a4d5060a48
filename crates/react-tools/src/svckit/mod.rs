//! Service Kit - Agent Tools
//!
//! Concrete tools that implement `agent_core::Tool`.

mod calculator;
mod web_search;
mod wikipedia;

pub use calculator::{CalculatorTool, Operation};
pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;
