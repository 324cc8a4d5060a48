//! Error Types for the Tools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

/// Failures inside a tool. They never leave the tool: each one is rendered
/// into the tool's output text.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid JSON input. Ensure the input follows the format {{'operation': 'add', 'params': {{'a': 5, 'b': 3}}}}.")]
    InvalidJson,

    #[error("Missing 'operation' or 'params' in request. Ensure the format is {{'operation': 'add', 'params': {{'a': 5, 'b': 3}}}}.")]
    MissingField,

    #[error("Parameters must be in the format {{'a': <num>, 'b': <num>}}.")]
    InvalidParams,

    #[error("Unknown operation '{operation}'. Available operations: {available}.")]
    UnknownOperation { operation: String, available: String },

    #[error("Division by zero is not allowed.")]
    DivisionByZero,

    #[error("Modulus by zero is not allowed.")]
    ModulusByZero,

    #[error("Query cannot be empty.")]
    EmptyQuery,

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
