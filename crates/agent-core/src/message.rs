//! Conversation Messages
//!
//! Role-tagged messages and the conversation store that owns them, together
//! with the rolling summary of turns evicted by memory compaction.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Observations and diagnostics injected by the agent
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now", skip_serializing)]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Conversation history plus the rolling summary of evicted turns.
///
/// Messages are kept in chronological order. The only way to remove
/// messages is [`Conversation::evict`], which drops one contiguous span.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,

    #[serde(default)]
    rolling_summary: String,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Summary of everything evicted so far (empty until the first compaction)
    pub fn rolling_summary(&self) -> &str {
        &self.rolling_summary
    }

    /// Append a summary chunk, space-joined with what is already there
    pub fn append_summary(&mut self, summary: &str) {
        let summary = summary.trim();
        if summary.is_empty() {
            return;
        }
        if self.rolling_summary.is_empty() {
            self.rolling_summary = summary.to_string();
        } else {
            self.rolling_summary.push(' ');
            self.rolling_summary.push_str(summary);
        }
    }

    /// Remove a contiguous span of messages, returning them
    pub fn evict(&mut self, span: Range<usize>) -> Vec<Message> {
        let end = span.end.min(self.messages.len());
        let start = span.start.min(end);
        self.messages.drain(start..end).collect()
    }

    /// Indices of all `user` messages, in order
    pub fn user_indices(&self) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == Role::User)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of `user` messages in the live window
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    /// Concatenation of every message body, role tags excluded
    pub fn joined_content(&self) -> String {
        self.messages.iter().map(|m| m.content.as_str()).collect()
    }

    /// Messages appended after the most recent `user` message
    pub fn since_last_user(&self) -> &[Message] {
        let start = self
            .messages
            .iter()
            .rposition(|m| m.role == Role::User)
            .map_or(0, |i| i + 1);
        &self.messages[start..]
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        let mut conv = Conversation::new();
        conv.push(Message::user("q1"));
        conv.push(Message::assistant("a1"));
        conv.push(Message::user("q2"));
        conv.push(Message::assistant("Action: wikipedia: Rust"));
        conv.push(Message::system("Observation: wikipedia tool output: ..."));
        conv
    }

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_user_indices() {
        let conv = sample();
        assert_eq!(conv.user_indices(), vec![0, 2]);
        assert_eq!(conv.user_turns(), 2);
    }

    #[test]
    fn test_since_last_user_excludes_query() {
        let conv = sample();
        let tail = conv.since_last_user();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].role, Role::Assistant);
        assert_eq!(tail[1].role, Role::System);
    }

    #[test]
    fn test_evict_is_contiguous() {
        let mut conv = sample();
        let evicted = conv.evict(0..2);
        assert_eq!(evicted.len(), 2);
        assert_eq!(conv.len(), 3);
        assert_eq!(conv.messages()[0].content, "q2");
    }

    #[test]
    fn test_append_summary_space_joined() {
        let mut conv = Conversation::new();
        conv.append_summary("first");
        conv.append_summary("  ");
        conv.append_summary("second");
        assert_eq!(conv.rolling_summary(), "first second");
    }

    #[test]
    fn test_joined_content_excludes_roles() {
        let mut conv = Conversation::new();
        conv.push(Message::user("ab"));
        conv.push(Message::assistant("cd"));
        assert_eq!(conv.joined_content(), "abcd");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
