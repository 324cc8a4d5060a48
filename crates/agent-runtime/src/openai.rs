//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` for the chat-completions API, either on
//! an Azure OpenAI deployment or on OpenAI (and compatible) endpoints.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, GenerationOptions, LlmProvider, ModelInfo, TokenUsage},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

use crate::config::{ProviderSettings, RuntimeConfig};

#[derive(Clone, Debug)]
enum Endpoint {
    Azure {
        endpoint: String,
        api_key: String,
        api_version: String,
    },
    OpenAi {
        base_url: String,
        api_key: String,
    },
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Chat-completions provider for Azure OpenAI and OpenAI
pub struct OpenAiProvider {
    client: Client,
    endpoint: Endpoint,
    tokenizer: Option<CoreBPE>,
}

impl OpenAiProvider {
    /// Create from runtime configuration
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let endpoint = match &config.provider {
            ProviderSettings::Azure { endpoint, api_key, api_version } => Endpoint::Azure {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
                api_version: api_version.clone(),
            },
            ProviderSettings::OpenAi { base_url, api_key } => Endpoint::OpenAi {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
            },
            ProviderSettings::Ollama(_) => {
                return Err(AgentError::Config("ollama settings given to the OpenAI provider".into()));
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            tokenizer: load_tokenizer(&config.model),
        })
    }

    fn completions_url(&self, model: &str) -> String {
        match &self.endpoint {
            Endpoint::Azure { endpoint, api_version, .. } => format!(
                "{endpoint}/openai/deployments/{model}/chat/completions?api-version={api_version}"
            ),
            Endpoint::OpenAi { base_url, .. } => format!("{base_url}/chat/completions"),
        }
    }

    fn models_url(&self) -> String {
        match &self.endpoint {
            Endpoint::Azure { endpoint, api_version, .. } => {
                format!("{endpoint}/openai/models?api-version={api_version}")
            }
            Endpoint::OpenAi { base_url, .. } => format!("{base_url}/models"),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.endpoint {
            Endpoint::Azure { api_key, .. } => request.header("api-key", api_key),
            Endpoint::OpenAi { api_key, .. } => request.bearer_auth(api_key),
        }
    }

    /// Convert agent messages to the wire format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
        messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.to_string(),
                content: &m.content,
            })
            .collect()
    }

    /// Convert a chat-completions response to an agent completion
    fn convert_completion(response: ChatResponse, model: &str) -> Completion {
        Completion {
            content: response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content),
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

/// Model-specific BPE, falling back to `cl100k_base` for unknown models
fn load_tokenizer(model: &str) -> Option<CoreBPE> {
    match tiktoken_rs::get_bpe_from_model(model).or_else(|_| tiktoken_rs::cl100k_base()) {
        Ok(bpe) => Some(bpe),
        Err(e) => {
            tracing::warn!(model, error = %e, "no tokenizer available; using character estimate");
            None
        }
    }
}

/// Map a non-2xx status to an agent error
fn status_error(status: StatusCode, body: &str) -> AgentError {
    let detail = format!("{status}: {}", body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AgentError::ProviderUnavailable(detail)
    } else {
        AgentError::Provider(detail)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        match self.endpoint {
            Endpoint::Azure { .. } => "Azure OpenAI",
            Endpoint::OpenAi { .. } => "OpenAI",
        }
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("{} health check failed: {}", self.name(), e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .send(self.client.post(self.completions_url(&options.model)).json(&body))
            .await?
            .json::<ChatResponse>()
            .await
            .map_err(|e| AgentError::Provider(format!("response decode failed: {e}")))?;

        let completion = Self::convert_completion(response, &options.model);
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }
        Ok(completion)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .send(self.client.get(self.models_url()))
            .await?
            .json::<ModelList>()
            .await
            .map_err(|e| AgentError::Provider(format!("response decode failed: {e}")))?;

        Ok(models
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
            })
            .collect())
    }

    fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.as_ref().map_or_else(
            || text.len().div_ceil(4),
            |bpe| bpe.encode_with_special_tokens(text).len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;

    fn provider(vars: &[(&str, &str)]) -> OpenAiProvider {
        let vars: std::collections::HashMap<_, _> = vars.iter().copied().collect();
        let config = RuntimeConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        OpenAiProvider::from_config(&config).unwrap()
    }

    #[test]
    fn test_azure_urls() {
        let p = provider(&[
            ("AZURE_OPENAI_ENDPOINT", "https://acme.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "k"),
            ("OPENAI_API_VERSION", "2024-02-01"),
        ]);
        assert_eq!(
            p.completions_url("gpt-4o"),
            "https://acme.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
        );
        assert_eq!(p.name(), "Azure OpenAI");
    }

    #[test]
    fn test_openai_urls() {
        let p = provider(&[("OPENAI_API_KEY", "k")]);
        assert_eq!(p.completions_url("gpt-4o-mini"), "https://api.openai.com/v1/chat/completions");
        assert_eq!(p.models_url(), "https://api.openai.com/v1/models");
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![Message::system("prompt"), Message::user("Hello")];
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: OpenAiProvider::convert_messages(&messages),
            max_tokens: 500,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_convert_completion() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model":"gpt-4o","choices":[{"message":{"role":"assistant","content":"Final Answer: 4"}}],
                "usage":{"prompt_tokens":10,"completion_tokens":3,"total_tokens":13}}"#,
        )
        .unwrap();
        let completion = OpenAiProvider::convert_completion(response, "fallback");
        assert_eq!(completion.content.as_deref(), Some("Final Answer: 4"));
        assert_eq!(completion.model, "gpt-4o");
        assert_eq!(completion.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_null_content_is_absent() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        let completion = OpenAiProvider::convert_completion(response, "m");
        assert!(completion.content.is_none());
        assert_eq!(completion.model, "m");
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "slow down").is_retryable());
        assert!(status_error(StatusCode::BAD_GATEWAY, "").is_retryable());
        assert!(!status_error(StatusCode::UNAUTHORIZED, "bad key").is_retryable());
    }

    #[test]
    fn test_model_tokenizer() {
        let p = provider(&[("OPENAI_API_KEY", "k"), ("MODEL_NAME", "gpt-4o")]);
        assert_eq!(p.count_tokens(""), 0);
        let n = p.count_tokens("hello world");
        assert!((1..=3).contains(&n));
    }
}
