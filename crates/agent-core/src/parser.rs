//! Action Parser
//!
//! Extracts the model's intent from one free-text completion. The protocol
//! is line oriented and marker based:
//!
//! ```text
//! Thought: I need to add two numbers.
//! Action: calculator: {"operation": "add", "params": {"a": 2, "b": 2}}
//! PAUSE
//! ```
//!
//! or, to finish the turn:
//!
//! ```text
//! Final Answer: 4
//! ```
//!
//! `Final Answer:` anywhere in the completion wins over any `Action:`.
//! Only the first `Action:` line is honored.

use serde_json::Value;
use thiserror::Error;

/// Marker that ends the turn
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Marker that introduces a tool call
pub const ACTION_MARKER: &str = "Action:";

/// Tool whose argument must be a JSON object with an `operation` key
pub const CALCULATOR_TOOL: &str = "calculator";

/// A tool call extracted from an `Action:` line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionDirective {
    /// Lowercased, trimmed tool name
    pub tool_name: String,
    /// Trimmed argument text, passed verbatim to the tool
    pub argument: String,
}

/// Parsed intent of one completion
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// The model produced a final answer (text after the marker)
    Final(String),
    /// The model asked for a tool call
    Action(ActionDirective),
    /// Nothing usable could be extracted
    Unparseable(ParseError),
}

/// Why a completion could not be turned into a directive
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("no action or final answer found in the response")]
    NoDirective,

    #[error("action format is incorrect: {line}")]
    MalformedAction { line: String },

    #[error("invalid input for {tool}: {reason}")]
    InvalidArguments {
        tool: String,
        reason: String,
        argument: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    FinalAnswer,
    Action,
}

impl Marker {
    const fn literal(self) -> &'static str {
        match self {
            Self::FinalAnswer => FINAL_ANSWER_MARKER,
            Self::Action => ACTION_MARKER,
        }
    }
}

/// Every marker occurrence as `(byte offset, marker)`, in text order
fn scan(text: &str) -> Vec<(usize, Marker)> {
    let mut tokens: Vec<(usize, Marker)> = [Marker::FinalAnswer, Marker::Action]
        .into_iter()
        .flat_map(|marker| text.match_indices(marker.literal()).map(move |(at, _)| (at, marker)))
        .collect();
    tokens.sort_by_key(|(at, _)| *at);
    tokens
}

/// Parse one completion into a [`Directive`]
pub fn parse(completion: &str) -> Directive {
    let tokens = scan(completion);

    if let Some(&(at, marker)) = tokens.iter().find(|(_, m)| *m == Marker::FinalAnswer) {
        let answer = completion[at + marker.literal().len()..].trim();
        return Directive::Final(answer.to_string());
    }

    let Some(&(at, marker)) = tokens.first() else {
        return Directive::Unparseable(ParseError::NoDirective);
    };

    let rest = &completion[at..];
    let line = rest.lines().next().unwrap_or(rest).trim();
    let body = line[marker.literal().len()..].trim();

    match parse_action_body(body) {
        Ok(directive) => Directive::Action(directive),
        Err(ParseError::MalformedAction { .. }) => {
            Directive::Unparseable(ParseError::MalformedAction { line: line.to_string() })
        }
        Err(err) => Directive::Unparseable(err),
    }
}

fn parse_action_body(body: &str) -> Result<ActionDirective, ParseError> {
    let malformed = || ParseError::MalformedAction { line: body.to_string() };

    let (tool, argument) = body.split_once(':').ok_or_else(malformed)?;
    let tool_name = tool.trim().to_lowercase();
    if tool_name.is_empty() {
        return Err(malformed());
    }
    let argument = argument.trim().to_string();

    if tool_name == CALCULATOR_TOOL {
        validate_structured_argument(&tool_name, &argument)?;
    }

    Ok(ActionDirective { tool_name, argument })
}

fn validate_structured_argument(tool: &str, argument: &str) -> Result<(), ParseError> {
    let invalid = |reason: String| ParseError::InvalidArguments {
        tool: tool.to_string(),
        reason,
        argument: argument.to_string(),
    };

    let value: Value = serde_json::from_str(argument)
        .map_err(|e| invalid(format!("invalid JSON ({e})")))?;

    match value {
        Value::Object(map) if map.contains_key("operation") => Ok(()),
        Value::Object(_) => Err(invalid("missing 'operation' key".into())),
        _ => Err(invalid("expected a JSON object".into())),
    }
}
