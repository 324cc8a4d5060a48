//! Transcript splitting for front ends.
//!
//! Separates the reasoning trace (thoughts, actions, observations) from the
//! messages meant for the chat panel.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};
use crate::parser::FINAL_ANSWER_MARKER;

/// Markers that put a message in the reasoning trace
pub const TRACE_MARKERS: [&str; 5] = ["Thought:", "Action:", "PAUSE", "Observation:", FINAL_ANSWER_MARKER];

/// One query's messages, split for display
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Messages for the primary chat panel
    pub chat: Vec<Message>,
    /// Messages for the reasoning-trace panel
    pub trace: Vec<Message>,
}

pub fn is_trace(content: &str) -> bool {
    TRACE_MARKERS.iter().any(|m| content.contains(m))
}

/// Split a result set into chat and trace.
///
/// When the only answer is buried in the trace, the text after the first
/// `Final Answer:` marker of the latest answering message is surfaced as an
/// assistant chat message.
pub fn split(messages: &[Message]) -> Transcript {
    let mut transcript = Transcript::default();
    let mut final_answer = None;

    for message in messages {
        if let Some((_, answer)) = message.content.split_once(FINAL_ANSWER_MARKER) {
            final_answer = Some(answer.trim().to_string());
        }

        if is_trace(&message.content) {
            transcript.trace.push(message.clone());
        } else if !message.content.trim().is_empty() {
            transcript.chat.push(message.clone());
        }
    }

    if transcript.chat.is_empty() {
        if let Some(answer) = final_answer {
            transcript.chat.push(Message::new(Role::Assistant, answer));
        }
    }

    transcript
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tool_run() {
        let messages = vec![
            Message::assistant("Thought: add\nAction: calculator: {\"operation\":\"add\"}\nPAUSE"),
            Message::system("Observation: calculator tool output: 4"),
            Message::assistant("Final Answer: 4"),
        ];

        let t = split(&messages);
        assert_eq!(t.trace.len(), 3);
        assert_eq!(t.chat.len(), 1);
        assert_eq!(t.chat[0].role, Role::Assistant);
        assert_eq!(t.chat[0].content, "4");
    }

    #[test]
    fn test_answer_keeps_text_after_first_marker() {
        let t = split(&[Message::assistant("Final Answer: first part. Final Answer: second")]);
        assert_eq!(t.chat.len(), 1);
        assert_eq!(t.chat[0].content, "first part. Final Answer: second");
    }

    #[test]
    fn test_plain_reply_goes_to_chat() {
        let messages = vec![Message::assistant(
            "I'm sorry, but I couldn't find a satisfactory answer within the allowed number of iterations.",
        )];

        let t = split(&messages);
        assert!(t.trace.is_empty());
        assert_eq!(t.chat, messages);
    }

    #[test]
    fn test_final_answer_not_duplicated_when_chat_present() {
        let messages = vec![
            Message::assistant("Final Answer: 4"),
            Message::system("Error: Tool 'x' not found"),
        ];

        let t = split(&messages);
        assert_eq!(t.chat.len(), 1);
        assert_eq!(t.chat[0].content, "Error: Tool 'x' not found");
    }

    #[test]
    fn test_blank_messages_dropped() {
        let t = split(&[Message::assistant("   ")]);
        assert!(t.chat.is_empty());
        assert!(t.trace.is_empty());
    }
}
