//! Application State

use std::sync::Arc;

use tokio::sync::Mutex;

use agent_core::{Agent, LlmProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The single agent; queries are serialized through the lock
    pub agent: Arc<Mutex<Agent>>,

    /// Same provider the agent uses, reachable without taking the lock
    pub provider: Arc<dyn LlmProvider>,

    /// Registered tool names, in catalog order
    pub tools: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(agent: Agent, provider: Arc<dyn LlmProvider>) -> Self {
        let tools = agent.tools().names().into_iter().map(String::from).collect();
        Self {
            agent: Arc::new(Mutex::new(agent)),
            provider,
            tools: Arc::new(tools),
        }
    }
}
