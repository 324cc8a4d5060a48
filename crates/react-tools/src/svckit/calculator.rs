//! Calculator Tool
//!
//! Binary arithmetic on structured JSON input:
//!
//! ```json
//! {"operation": "add", "params": {"a": 5, "b": 3}}
//! ```

use async_trait::async_trait;
use serde_json::Value;

use agent_core::{Tool, ToolResult};

use crate::error::{Result, ToolError};

/// Supported operations, in the order they are advertised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Multiply,
    Subtract,
    Divide,
    Power,
    Modulus,
}

impl Operation {
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Multiply,
        Self::Subtract,
        Self::Divide,
        Self::Power,
        Self::Modulus,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Modulus => "modulus",
        }
    }

    /// Look up an operation by its exact name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Apply the operation to `a` and `b`
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            Self::Add => Ok(a + b),
            Self::Multiply => Ok(a * b),
            Self::Subtract => Ok(a - b),
            Self::Divide if b == 0.0 => Err(ToolError::DivisionByZero),
            Self::Divide => Ok(a / b),
            Self::Power => Ok(a.powf(b)),
            Self::Modulus => floor_mod(a.trunc(), b.trunc()),
        }
    }
}

/// Integer modulus whose sign follows the divisor
fn floor_mod(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(ToolError::ModulusByZero);
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn available_operations() -> String {
    Operation::ALL.map(Operation::name).join(", ")
}

/// Tool for basic arithmetic
pub struct CalculatorTool;

impl CalculatorTool {
    pub const NAME: &'static str = "calculator";

    /// Evaluate a raw JSON query
    pub fn evaluate(query: &str) -> Result<f64> {
        let data: Value = serde_json::from_str(query).map_err(|_| ToolError::InvalidJson)?;

        let (Some(operation), Some(params)) = (data.get("operation"), data.get("params")) else {
            return Err(ToolError::MissingField);
        };

        let (Some(a), Some(b)) = (
            params.get("a").and_then(Value::as_f64),
            params.get("b").and_then(Value::as_f64),
        ) else {
            return Err(ToolError::InvalidParams);
        };

        let name = operation.as_str().unwrap_or_default();
        let op = Operation::from_name(name).ok_or_else(|| ToolError::UnknownOperation {
            operation: operation.as_str().map_or_else(|| operation.to_string(), str::to_string),
            available: available_operations(),
        })?;

        op.apply(a, b)
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Performs basic mathematical operations such as addition, multiplication, subtraction, \
         division, exponentiation, and modulus. Each operation must be called separately with \
         structured JSON input, e.g. {\"operation\": \"add\", \"params\": {\"a\": 5, \"b\": 3}}."
    }

    async fn run(&self, query: &str) -> ToolResult {
        match Self::evaluate(query) {
            Ok(value) => ToolResult::success(value.to_string()),
            Err(e) => {
                tracing::debug!(query, error = %e, "calculator rejected input");
                ToolResult::failure(e)
            }
        }
    }
}
