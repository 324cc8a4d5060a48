//! Scripted provider used by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider, ModelInfo};

/// Replays canned completions in order and records every request.
///
/// Once the script runs out, the `fallback` reply is returned (or an empty
/// completion when there is none).
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    fail: bool,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same completion
    pub fn repeating(reply: impl Into<String>) -> Self {
        let mut provider = Self::new(Vec::<String>::new());
        provider.fallback = Some(reply.into());
        provider
    }

    /// Every call fails with a transport error
    pub fn failing() -> Self {
        let mut provider = Self::new(Vec::<String>::new());
        provider.fail = true;
        provider
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(AgentError::ProviderUnavailable("connection refused".into()));
        }
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone());
        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: None,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
        }])
    }
}
