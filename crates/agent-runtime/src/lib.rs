//! # agent-runtime
//!
//! Runtime providers and configuration for the ReAct agent.
//!
//! ## Providers
//!
//! - **Azure OpenAI / OpenAI**: chat-completions over HTTPS, with a
//!   model-matched BPE tokenizer for memory budgeting
//! - **Ollama** (default feature): local LLM inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env()?;
//! let agent = Agent::new(config.build_provider()?, tools, config.agent_config()?);
//! ```

pub mod config;
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use config::{OllamaConfig, ProviderSettings, RuntimeConfig};
pub use openai::OpenAiProvider;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
