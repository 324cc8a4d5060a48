//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: the agent thinks (one LLM
//! call), acts (one tool call), observes (tool output appended to the
//! conversation) and repeats until the model gives a final answer or the
//! iteration budget runs out.
//!
//! ```text
//!            ┌──────────── Observation ────────────┐
//!            ▼                                     │
//!   ──▶  Thinking ──Action──▶ Dispatching ─────────┘
//!            │
//!            ├── Final Answer ──▶ Terminated
//!            ├── Unparseable ───▶ Terminated
//!            └── budget spent ──▶ Terminated (apology)
//! ```

use std::sync::Arc;

use chrono::Local;

use crate::error::{AgentError, Result};
use crate::memory::{CompactionPolicy, MemoryCompactor};
use crate::message::{Conversation, Message};
use crate::parser::{self, ActionDirective, Directive, ParseError};
use crate::prompt::{PromptTemplate, render_system_prompt};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::ToolRegistry;

/// Reply appended when the iteration budget is exhausted
pub const MAX_ITERATIONS_REPLY: &str =
    "I'm sorry, but I couldn't find a satisfactory answer within the allowed number of iterations.";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Maximum think cycles per user query
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// When and how much history to summarize
    pub compaction: CompactionPolicy,

    /// System prompt template (`{tools}`, `{date}`)
    pub system_prompt: PromptTemplate,

    /// Summarization prompt template (`{chats}`)
    pub summary_prompt: PromptTemplate,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            generation: GenerationOptions::default(),
            compaction: CompactionPolicy::default(),
            system_prompt: PromptTemplate::default_system(),
            summary_prompt: PromptTemplate::default_summary(),
        }
    }
}

/// How a user query ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model gave a final answer
    Answered(String),
    /// The iteration budget ran out
    IterationsExhausted,
    /// The last completion could not be parsed; the turn ends without an answer
    Unparseable(ParseError),
}

/// Everything produced by one user query
#[derive(Clone, Debug)]
pub struct Turn {
    pub outcome: TurnOutcome,
    /// Think cycles started, including the one that hit the budget
    pub iterations: usize,
    /// Messages appended after the user's query, in order
    pub messages: Vec<Message>,
}

enum LoopState {
    Thinking,
    Dispatching(ActionDirective),
    Terminated(TurnOutcome),
}

/// The main Agent struct
///
/// Owns one conversation. Queries are resolved one at a time: every LLM and
/// tool call of a query completes before `execute` returns.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    compactor: MemoryCompactor,
    conversation: Conversation,
    iteration: usize,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        let compactor = MemoryCompactor::new(config.compaction.clone(), config.summary_prompt.clone());
        Self {
            provider,
            tools,
            config,
            compactor,
            conversation: Conversation::new(),
            iteration: 0,
        }
    }

    /// Answer a user query, returning the messages it produced.
    ///
    /// LLM transport failures are returned as errors; the conversation keeps
    /// whatever was appended before the failure.
    pub async fn execute(&mut self, query: &str) -> Result<Vec<Message>> {
        self.respond(query).await.map(|turn| turn.messages)
    }

    /// Answer a user query with the full turn report
    pub async fn respond(&mut self, query: &str) -> Result<Turn> {
        self.iteration = 0;
        self.conversation.push(Message::user(query));
        tracing::info!(query, "new user query");

        let mut state = LoopState::Thinking;
        let outcome = loop {
            state = match state {
                LoopState::Thinking => self.think().await?,
                LoopState::Dispatching(action) => self.dispatch(action).await,
                LoopState::Terminated(outcome) => break outcome,
            };
        };

        tracing::info!(iterations = self.iteration, ?outcome, "query finished");

        Ok(Turn {
            outcome,
            iterations: self.iteration,
            messages: self.conversation.since_last_user().to_vec(),
        })
    }

    /// One think cycle: compact memory, call the LLM, parse its reply
    async fn think(&mut self) -> Result<LoopState> {
        self.iteration += 1;

        if self.iteration > self.config.max_iterations {
            tracing::warn!(max = self.config.max_iterations, "reached maximum iterations, stopping");
            self.conversation.push(Message::assistant(MAX_ITERATIONS_REPLY));
            return Ok(LoopState::Terminated(TurnOutcome::IterationsExhausted));
        }

        self.compactor
            .run(&mut self.conversation, self.provider.as_ref(), &self.config.generation)
            .await;

        let system_prompt = self.build_system_prompt();
        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend_from_slice(self.conversation.messages());

        let completion = self
            .provider
            .complete(&messages, &self.config.generation)
            .await?;
        let reply = completion.text();

        tracing::debug!(iteration = self.iteration, %reply, "assistant reply");
        self.conversation.push(Message::assistant(reply.as_str()));

        Ok(match parser::parse(&reply) {
            Directive::Final(answer) => LoopState::Terminated(TurnOutcome::Answered(answer)),
            Directive::Action(action) => LoopState::Dispatching(action),
            Directive::Unparseable(err) => self.report_unparseable(err),
        })
    }

    /// Run the requested tool and record what it said
    async fn dispatch(&mut self, action: ActionDirective) -> LoopState {
        let observation = match self.tools.resolve(&action.tool_name) {
            Some(tool) => {
                tracing::debug!(tool = %action.tool_name, argument = %action.argument, "executing tool");
                let result = tool.run(&action.argument).await;
                if !result.success {
                    tracing::debug!(tool = %action.tool_name, "tool reported a failure");
                }
                format!("Observation: {} tool output: {result}", action.tool_name)
            }
            None => {
                tracing::warn!(tool = %action.tool_name, "unknown tool requested");
                format!("Error: Tool '{}' not found", action.tool_name)
            }
        };

        self.conversation.push(Message::system(observation));
        LoopState::Thinking
    }

    /// Malformed replies end the turn. Invalid tool input is also written
    /// back into the conversation so the model sees it on the next query.
    fn report_unparseable(&mut self, err: ParseError) -> LoopState {
        tracing::warn!(error = %err, "could not extract a directive from the reply");
        if matches!(err, ParseError::InvalidArguments { .. }) {
            self.conversation.push(Message::system(format!("Error: {err}")));
        }
        LoopState::Terminated(TurnOutcome::Unparseable(err))
    }

    /// Build the system prompt for the current cycle
    fn build_system_prompt(&self) -> String {
        render_system_prompt(
            &self.config.system_prompt,
            &self.tools.describe(),
            &Local::now(),
            self.conversation.rolling_summary(),
        )
    }

    /// Think cycles started by the current (or last) query
    pub const fn iterations(&self) -> usize {
        self.iteration
    }

    /// The conversation owned by this agent
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, template: PromptTemplate) -> Self {
        self.config.system_prompt = template;
        self
    }

    pub fn summary_prompt(mut self, template: PromptTemplate) -> Self {
        self.config.summary_prompt = template;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub const fn max_tokens(mut self, max: u32) -> Self {
        self.config.generation.max_tokens = max;
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn compaction(mut self, policy: CompactionPolicy) -> Self {
        self.config.compaction = policy;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::testing::ScriptedProvider;
    use crate::tool::{Tool, ToolResult};
    use async_trait::async_trait;

    /// Adds `a` and `b` from `{"params": {"a":..,"b":..}}`
    struct Adder;

    #[async_trait]
    impl Tool for Adder {
        fn name(&self) -> &str {
            "calculator"
        }

        fn description(&self) -> &str {
            "adds numbers"
        }

        async fn run(&self, query: &str) -> ToolResult {
            let Ok(v) = serde_json::from_str::<serde_json::Value>(query) else {
                return ToolResult::failure("Invalid JSON input.");
            };
            let a = v["params"]["a"].as_f64().unwrap_or_default();
            let b = v["params"]["b"].as_f64().unwrap_or_default();
            ToolResult::success((a + b).to_string())
        }
    }

    fn agent(provider: Arc<ScriptedProvider>) -> Agent {
        AgentBuilder::new()
            .provider(provider)
            .tool(Adder)
            .build()
            .unwrap()
    }

    const ADD_ACTION: &str =
        r#"Thought: add them
Action: calculator: {"operation":"add","params":{"a":2,"b":2}}
PAUSE"#;

    #[tokio::test]
    async fn test_single_tool_round_trip() {
        let provider = Arc::new(ScriptedProvider::new([ADD_ACTION, "Final Answer: 4"]));
        let mut agent = agent(provider.clone());

        let messages = agent.execute("What is 2 + 2?").await.unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, ADD_ACTION);
        assert_eq!(messages[1].role, Role::System);
        assert_eq!(messages[1].content, "Observation: calculator tool output: 4");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "Final Answer: 4");

        assert_eq!(provider.calls(), 2);
        assert_eq!(agent.iterations(), 2);

        // Second call carries the observation as the latest message
        let second = &provider.requests()[1];
        assert_eq!(second[0].role, Role::System);
        assert!(second[0].content.contains("calculator: adds numbers"));
        assert_eq!(second.last().unwrap().content, "Observation: calculator tool output: 4");
    }

    #[tokio::test]
    async fn test_final_answer_stops_without_dispatch() {
        let provider = Arc::new(ScriptedProvider::new([
            "Final Answer: 42\nAction: calculator: {\"operation\":\"add\"}",
        ]));
        let mut agent = agent(provider.clone());

        let turn = agent.respond("meaning of life?").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Answered("42\nAction: calculator: {\"operation\":\"add\"}".into()));
        assert_eq!(turn.messages.len(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation() {
        let provider = Arc::new(ScriptedProvider::new([
            "Action: stock_ticker: AAPL",
            "Final Answer: I cannot look that up.",
        ]));
        let mut agent = agent(provider.clone());

        let turn = agent.respond("AAPL price?").await.unwrap();

        assert_eq!(turn.messages[1].role, Role::System);
        assert_eq!(turn.messages[1].content, "Error: Tool 'stock_ticker' not found");
        assert_eq!(turn.iterations, 2);
        assert!(matches!(turn.outcome, TurnOutcome::Answered(_)));
    }

    #[tokio::test]
    async fn test_iteration_budget() {
        let provider = Arc::new(ScriptedProvider::repeating("Action: stock_ticker: AAPL"));
        let mut agent = AgentBuilder::new()
            .provider(provider.clone())
            .max_iterations(3)
            .build()
            .unwrap();

        let turn = agent.respond("loop forever").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::IterationsExhausted);
        assert_eq!(turn.iterations, 4);
        assert_eq!(provider.calls(), 3);
        assert_eq!(turn.messages.last().unwrap().content, MAX_ITERATIONS_REPLY);
        // 3 replies + 3 error observations + apology
        assert_eq!(turn.messages.len(), 7);
    }

    #[tokio::test]
    async fn test_counter_resets_per_query() {
        let provider = Arc::new(ScriptedProvider::new([ADD_ACTION, "Final Answer: 4", "Final Answer: hi"]));
        let mut agent = agent(provider);

        agent.execute("2 + 2").await.unwrap();
        assert_eq!(agent.iterations(), 2);
        let messages = agent.execute("hello").await.unwrap();
        assert_eq!(agent.iterations(), 1);
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_ends_turn() {
        let provider = Arc::new(ScriptedProvider::new(["I'm not sure what to do."]));
        let mut agent = agent(provider.clone());

        let turn = agent.respond("hmm").await.unwrap();

        assert_eq!(turn.outcome, TurnOutcome::Unparseable(ParseError::NoDirective));
        assert_eq!(turn.messages.len(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_calculator_input_reported() {
        let provider = Arc::new(ScriptedProvider::new(["Action: calculator: two plus two"]));
        let mut agent = agent(provider.clone());

        let turn = agent.respond("2+2").await.unwrap();

        assert!(matches!(turn.outcome, TurnOutcome::Unparseable(ParseError::InvalidArguments { .. })));
        assert_eq!(turn.messages.len(), 2);
        assert_eq!(turn.messages[1].role, Role::System);
        assert!(turn.messages[1].content.starts_with("Error: invalid input for calculator"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_completion_is_placeholder() {
        let provider = Arc::new(ScriptedProvider::new(["   "]));
        let mut agent = agent(provider);

        let messages = agent.execute("anything").await.unwrap();

        assert_eq!(messages[0].content, crate::provider::NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::failing());
        let mut agent = agent(provider);

        let err = agent.execute("anything").await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(agent.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_compaction_feeds_summary_into_prompt() {
        let long = "z".repeat(1600);
        let provider = Arc::new(ScriptedProvider::new([
            format!("Final Answer: {long}"),
            format!("Final Answer: {long}"),
            format!("Final Answer: {long}"),
            "Earlier the user asked three things.".to_string(),
            "Final Answer: done".to_string(),
        ]));
        let mut agent = agent(provider.clone());

        for q in ["one", "two", "three"] {
            agent.execute(q).await.unwrap();
        }
        agent.execute("four").await.unwrap();

        assert_eq!(agent.conversation().rolling_summary(), "Earlier the user asked three things.");
        assert_eq!(agent.conversation().messages()[0].content, "four");

        let last = provider.requests().pop().unwrap();
        assert!(last[0].content.ends_with("Old messages summary:\nEarlier the user asked three things."));
        assert_eq!(last.len(), 2);
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }

    #[test]
    fn test_builder_applies_settings() {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::repeating("Final Answer: ok")))
            .model("gpt-4o")
            .max_tokens(256)
            .max_iterations(3)
            .compaction(CompactionPolicy { turns_to_summarize: 2, max_history_tokens: 400 })
            .build()
            .unwrap();

        let config = agent.config();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.max_tokens, 256);
        assert_eq!(config.compaction.turns_to_summarize, 2);
        assert_eq!(config.compaction.max_history_tokens, 400);
    }
}
