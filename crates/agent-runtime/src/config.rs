//! Runtime Configuration
//!
//! Everything the binaries need, read from the environment (after
//! `dotenvy` has loaded `.env`).

use std::path::PathBuf;
use std::sync::Arc;

use agent_core::{
    error::{AgentError, Result},
    memory::CompactionPolicy,
    prompt::PromptTemplate,
    provider::{GenerationOptions, LlmProvider},
    reasoning::AgentConfig,
};

use crate::openai::OpenAiProvider;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Ollama provider configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

/// Which backend to talk to, with its credentials
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderSettings {
    /// Azure OpenAI deployment; the model name is the deployment name
    Azure {
        endpoint: String,
        api_key: String,
        api_version: String,
    },
    /// OpenAI or any OpenAI-compatible endpoint
    OpenAi { base_url: String, api_key: String },
    /// Local Ollama server
    Ollama(OllamaConfig),
}

impl ProviderSettings {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Azure { .. } => "azure",
            Self::OpenAi { .. } => "openai",
            Self::Ollama(_) => "ollama",
        }
    }
}

/// Process-wide configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub provider: ProviderSettings,
    pub model: String,
    pub max_tokens: u32,
    pub max_iterations: usize,
    pub timeout_secs: u64,
    pub tavily_api_key: Option<String>,
    pub system_prompt_path: Option<PathBuf>,
    pub summary_prompt_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let kind = match get("LLM_PROVIDER") {
            Some(kind) => kind.to_lowercase(),
            None if get("AZURE_OPENAI_ENDPOINT").is_some() => "azure".into(),
            None if get("OPENAI_API_KEY").is_some() => "openai".into(),
            None => "ollama".into(),
        };

        let require = |key: &str| {
            get(key).ok_or_else(|| AgentError::Config(format!("{key} must be set for the {kind} provider")))
        };

        let provider = match kind.as_str() {
            "azure" => ProviderSettings::Azure {
                endpoint: require("AZURE_OPENAI_ENDPOINT")?,
                api_key: require("AZURE_OPENAI_API_KEY")?,
                api_version: get("OPENAI_API_VERSION").unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.into()),
            },
            "openai" => ProviderSettings::OpenAi {
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
                api_key: require("OPENAI_API_KEY")?,
            },
            "ollama" => ProviderSettings::Ollama(OllamaConfig {
                host: get("OLLAMA_HOST").unwrap_or_else(|| OllamaConfig::default().host),
                port: parse_or("OLLAMA_PORT", get("OLLAMA_PORT"), OllamaConfig::default().port)?,
            }),
            other => {
                return Err(AgentError::Config(format!(
                    "unknown LLM_PROVIDER '{other}' (expected azure, openai or ollama)"
                )));
            }
        };

        let default_model = match provider {
            ProviderSettings::Ollama(_) => DEFAULT_OLLAMA_MODEL,
            _ => DEFAULT_OPENAI_MODEL,
        };

        Ok(Self {
            model: get("MODEL_NAME").unwrap_or_else(|| default_model.into()),
            max_tokens: parse_or("AGENT_MAX_TOKENS", get("AGENT_MAX_TOKENS"), 500)?,
            max_iterations: parse_or("AGENT_MAX_ITERATIONS", get("AGENT_MAX_ITERATIONS"), 10)?,
            timeout_secs: parse_or("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"), 120)?,
            tavily_api_key: get("TAVILY_API_KEY"),
            system_prompt_path: get("SYSTEM_PROMPT_PATH").map(PathBuf::from),
            summary_prompt_path: get("SUMMARY_PROMPT_PATH").map(PathBuf::from),
            provider,
        })
    }

    /// Agent configuration with prompt templates loaded
    pub fn agent_config(&self) -> Result<AgentConfig> {
        let system_prompt = match &self.system_prompt_path {
            Some(path) => PromptTemplate::system_from_file(path)?,
            None => PromptTemplate::default_system(),
        };
        let summary_prompt = match &self.summary_prompt_path {
            Some(path) => PromptTemplate::summary_from_file(path)?,
            None => PromptTemplate::default_summary(),
        };

        Ok(AgentConfig {
            max_iterations: self.max_iterations,
            generation: GenerationOptions {
                model: self.model.clone(),
                max_tokens: self.max_tokens,
                ..Default::default()
            },
            compaction: CompactionPolicy::default(),
            system_prompt,
            summary_prompt,
        })
    }

    /// Instantiate the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        match &self.provider {
            ProviderSettings::Azure { .. } | ProviderSettings::OpenAi { .. } => {
                Ok(Arc::new(OpenAiProvider::from_config(self)?))
            }
            #[cfg(feature = "ollama")]
            ProviderSettings::Ollama(config) => {
                Ok(Arc::new(crate::ollama::OllamaProvider::from_config(config.clone())))
            }
            #[cfg(not(feature = "ollama"))]
            ProviderSettings::Ollama(_) => Err(AgentError::Config(
                "this build does not include the ollama provider".into(),
            )),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    value.map_or(Ok(default), |v| {
        v.parse()
            .map_err(|_| AgentError::Config(format!("{key} has an invalid value: '{v}'")))
    })
}
