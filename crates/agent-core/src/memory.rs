//! Memory Compaction
//!
//! Keeps the live conversation inside a token budget by summarizing the
//! oldest user turns with the LLM and folding the result into the rolling
//! summary.
//!
//! Compaction is all-or-nothing: a span is evicted only after a non-empty
//! summary for it has been appended. Any failure leaves the conversation
//! untouched.

use std::ops::Range;

use crate::error::Result;
use crate::message::{Conversation, Message};
use crate::prompt::{PromptTemplate, render_summary_prompt};
use crate::provider::{GenerationOptions, LlmProvider};

/// When to compact and how much to summarize at once
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactionPolicy {
    /// Number of user turns summarized per compaction; compaction needs
    /// strictly more user turns than this in the live window
    pub turns_to_summarize: usize,

    /// Token budget for the concatenated message contents
    pub max_history_tokens: usize,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            turns_to_summarize: 3,
            max_history_tokens: 1000,
        }
    }
}

/// What a compaction attempt did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompactionOutcome {
    /// Trigger condition not met; nothing touched
    NotNeeded,
    /// Span summarized and evicted
    Compacted {
        evicted: usize,
        span_tokens: usize,
        summary_tokens: usize,
    },
    /// The LLM gave no usable summary; nothing touched
    NoSummary,
    /// Summarization failed; nothing touched
    Failed(String),
}

/// Sliding-window compactor
#[derive(Clone, Debug)]
pub struct MemoryCompactor {
    policy: CompactionPolicy,
    template: PromptTemplate,
}

impl Default for MemoryCompactor {
    fn default() -> Self {
        Self::new(CompactionPolicy::default(), PromptTemplate::default_summary())
    }
}

impl MemoryCompactor {
    pub const fn new(policy: CompactionPolicy, template: PromptTemplate) -> Self {
        Self { policy, template }
    }

    /// Tokens in the concatenation of all message contents
    pub fn history_tokens(conversation: &Conversation, provider: &dyn LlmProvider) -> usize {
        provider.count_tokens(&conversation.joined_content())
    }

    /// Trigger condition: too many user turns and too many tokens
    pub fn should_compact(&self, conversation: &Conversation, provider: &dyn LlmProvider) -> bool {
        conversation.user_turns() > self.policy.turns_to_summarize
            && Self::history_tokens(conversation, provider) > self.policy.max_history_tokens
    }

    /// Span from the first user message up to (not including) the
    /// `(turns_to_summarize + 1)`-th one
    pub fn select_span(&self, conversation: &Conversation) -> Option<Range<usize>> {
        let users = conversation.user_indices();
        let start = *users.first()?;
        let end = *users.get(self.policy.turns_to_summarize)?;
        (start < end).then_some(start..end)
    }

    /// Compact once if the trigger condition holds
    pub async fn compact(
        &self,
        conversation: &mut Conversation,
        provider: &dyn LlmProvider,
        options: &GenerationOptions,
    ) -> Result<CompactionOutcome> {
        if !self.should_compact(conversation, provider) {
            return Ok(CompactionOutcome::NotNeeded);
        }
        let Some(span) = self.select_span(conversation) else {
            return Ok(CompactionOutcome::NotNeeded);
        };

        let chats = &conversation.messages()[span.clone()];
        let serialized = serde_json::to_string(chats)?;
        let span_tokens =
            provider.count_tokens(&chats.iter().map(|m| m.content.as_str()).collect::<String>());

        let prompt = render_summary_prompt(&self.template, &serialized);
        let completion = provider
            .complete(&[Message::system(prompt)], options)
            .await?;

        if !completion.has_text() {
            tracing::warn!(span_tokens, "summarizer returned no text; history left uncompacted");
            return Ok(CompactionOutcome::NoSummary);
        }

        let summary = completion.text();
        let summary_tokens = provider.count_tokens(&summary);
        conversation.append_summary(&summary);
        let evicted = conversation.evict(span).len();

        tracing::info!(
            evicted,
            span_tokens,
            summary_tokens,
            summary = %conversation.rolling_summary(),
            "conversation compacted"
        );

        Ok(CompactionOutcome::Compacted {
            evicted,
            span_tokens,
            summary_tokens,
        })
    }

    /// Best-effort compaction: errors are logged and swallowed
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        provider: &dyn LlmProvider,
        options: &GenerationOptions,
    ) -> CompactionOutcome {
        match self.compact(conversation, provider, options).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "memory compaction failed; continuing uncompacted");
                CompactionOutcome::Failed(e.to_string())
            }
        }
    }
}
