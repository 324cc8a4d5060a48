//! Ollama LLM Provider
//!
//! Local inference through the Ollama chat API. Token counts use the
//! character estimate from the trait default.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, GenerationOptions, LlmProvider, ModelInfo},
};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::{
        chat::{ChatMessage, MessageRole, request::ChatMessageRequest},
    },
    models::ModelOptions as OllamaOptions,
};

use crate::config::OllamaConfig;

const fn ollama_role(role: Role) -> MessageRole {
    match role {
        Role::System => MessageRole::System,
        Role::User => MessageRole::User,
        Role::Assistant => MessageRole::Assistant,
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    ChatMessage::new(ollama_role(message.role), message.content.clone())
}

fn sampling(opts: &GenerationOptions) -> OllamaOptions {
    OllamaOptions::default()
        .temperature(opts.temperature)
        .num_predict(i32::try_from(opts.max_tokens).unwrap_or(i32::MAX))
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
    address: String,
}

impl OllamaProvider {
    pub fn from_config(config: OllamaConfig) -> Self {
        let address = format!("{}:{}", config.host, config.port);
        Self {
            client: Ollama::new(config.host, config.port),
            address,
        }
    }

    /// Provider for `http://localhost:11434`
    pub fn localhost() -> Self {
        Self::from_config(OllamaConfig::default())
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn health_check(&self) -> Result<bool> {
        let reachable = self.client.list_local_models().await.is_ok();
        if !reachable {
            tracing::warn!(address = %self.address, "Ollama is not reachable; is `ollama serve` running?");
        }
        Ok(reachable)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatMessageRequest::new(
            options.model.clone(),
            messages.iter().map(to_chat_message).collect(),
        )
        .options(sampling(options));

        let response = self.client.send_chat_messages(request).await.map_err(|e| {
            AgentError::ProviderUnavailable(format!("Ollama at {}: {e}", self.address))
        })?;

        let content = response.message.content;
        tracing::debug!(model = %options.model, chars = content.len(), "ollama completion");

        Ok(Completion {
            content: (!content.trim().is_empty()).then_some(content),
            model: options.model.clone(),
            usage: None,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
            })
            .collect())
    }
}
