//! JSON file read tool.

use super::traits::{Tool, ToolErrorKind, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::io::ErrorKind;

/// Reads a JSON document from disk and returns it re-serialized in indented,
/// human-readable form.
pub struct JsonReadTool;

impl JsonReadTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReadTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for JsonReadTool {
    fn name(&self) -> &str {
        "read_json"
    }

    fn description(&self) -> &str {
        "Read a JSON file and return its contents as a formatted string."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path to read"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return Ok(ToolErrorKind::MissingArgument("path").into());
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(ToolErrorKind::NotFound(path.to_string()).into());
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "JSON read failed");
                return Ok(ToolErrorKind::Read(e.to_string()).into());
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => return Ok(ToolErrorKind::MalformedJson(e.to_string()).into()),
        };

        match serde_json::to_string_pretty(&value) {
            Ok(text) => Ok(ToolResult::ok(text)),
            Err(e) => Ok(ToolErrorKind::Read(e.to_string()).into()),
        }
    }
}
