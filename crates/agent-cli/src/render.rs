//! Terminal rendering of agent messages

use crossterm::style::{StyledContent, Stylize};

use agent_core::{Message, parser::FINAL_ANSWER_MARKER};

/// Display category of a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Answer,
    Action,
    Observation,
    Thought,
    Error,
    Plain,
}

impl Kind {
    pub fn of(content: &str) -> Self {
        if content.contains(FINAL_ANSWER_MARKER) {
            Self::Answer
        } else if content.starts_with("Observation:") {
            Self::Observation
        } else if content.starts_with("Error:") {
            Self::Error
        } else if content.contains("Action:") {
            Self::Action
        } else if content.contains("Thought:") {
            Self::Thought
        } else {
            Self::Plain
        }
    }

    fn label(self) -> StyledContent<&'static str> {
        match self {
            Self::Answer => "answer".green().bold(),
            Self::Action => "action".yellow(),
            Self::Observation => "observe".cyan(),
            Self::Thought => "think".dark_grey(),
            Self::Error => "error".red().bold(),
            Self::Plain => "agent".white(),
        }
    }
}

/// One message, prefixed with a colored category label
pub fn line(message: &Message) -> String {
    let kind = Kind::of(&message.content);
    let body = message.content.trim();
    match kind {
        Kind::Answer => format!("[{}] {}", kind.label(), body.bold()),
        Kind::Thought => format!("[{}] {}", kind.label(), body.dark_grey()),
        _ => format!("[{}] {body}", kind.label()),
    }
}
