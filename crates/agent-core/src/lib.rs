//! # agent-core
//!
//! ReAct agent core: the think/act/observe loop, the text-protocol action
//! parser, sliding-window memory compaction and the tool registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Agent                              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │  Reasoning  │──│   Action    │  │   LlmProvider        │  │
//! │  │    Loop     │  │   Parser    │  │   (Strategy)         │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! │  ┌─────────────┐  ┌─────────────┐                            │
//! │  │Conversation │──│   Memory    │                            │
//! │  │   Store     │  │  Compactor  │      Tool Registry         │
//! │  └─────────────┘  └─────────────┘                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Azure OpenAI, OpenAI,
//! Ollama or any other backend without changing agent logic.

pub mod provider;
pub mod tool;
pub mod parser;
pub mod memory;
pub mod prompt;
pub mod reasoning;
pub mod message;
pub mod transcript;
pub mod error;

#[cfg(test)]
mod testing;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use parser::{ActionDirective, Directive, ParseError};
pub use provider::{GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, Turn, TurnOutcome};
pub use tool::{Tool, ToolRegistry, ToolResult};
pub use transcript::Transcript;
