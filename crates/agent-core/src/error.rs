//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
///
/// Tool failures never show up here: a tool renders its own failure as
/// observation text. Parse failures are reported through
/// [`crate::parser::ParseError`] and end the turn without an error.
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable, rate limited or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Prompt template could not be loaded or is missing a placeholder
    #[error("Prompt template error: {0}")]
    Prompt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::Io(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => {
                "The agent is currently unavailable. Please try again.".into()
            }
            Self::Prompt(_) | Self::Config(_) => {
                "The agent is misconfigured. Please contact the operator.".into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(AgentError::ProviderUnavailable("timeout".into()).is_retryable());
        assert!(!AgentError::Provider("bad request".into()).is_retryable());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AgentError::Config("AZURE_OPENAI_API_KEY missing".into());
        assert!(!err.user_message().contains("AZURE"));
    }
}
