//! Tool trait and result types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a tool execution.
///
/// Failures are data, not faults: the agent loop renders a `ToolResult` into
/// the descriptive string the model sees, so every error a tool can hit must
/// end up here rather than propagating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message.into()),
        }
    }

    /// The string fed back to the model as this tool call's result.
    pub fn render(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            self.error
                .clone()
                .unwrap_or_else(|| "Tool execution failed.".to_string())
        }
    }
}

/// Classified tool failures. Each variant's display form is the exact text
/// returned to the model, so changing one changes the tool contract.
#[derive(Debug, Error)]
pub enum ToolErrorKind {
    #[error("File '{0}' not found.")]
    NotFound(String),
    #[error("Invalid JSON in file - {0}")]
    MalformedJson(String),
    #[error("Error reading JSON from file: {0}")]
    Read(String),
    #[error("Error writing JSON to '{path}': {detail}")]
    Write { path: String, detail: String },
    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),
}

impl From<ToolErrorKind> for ToolResult {
    fn from(kind: ToolErrorKind) -> Self {
        ToolResult::error(kind.to_string())
    }
}

/// Declarative description of a tool, in the shape providers advertise to
/// the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
}

/// An agent-callable capability.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute with the model-supplied argument object.
    ///
    /// Expected failures (bad path, malformed file, missing argument) are
    /// encoded in the returned `ToolResult`; an `Err` here means the tool
    /// itself broke and is also rendered as an error string by the caller.
    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
