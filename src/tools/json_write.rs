//! JSON file write tool.

use super::traits::{Tool, ToolErrorKind, ToolResult};
use async_trait::async_trait;
use serde_json::json;

/// Writes a JSON document to a path on local disk, overwriting any existing
/// content. The serialized form is two-space indented UTF-8 with non-ASCII
/// characters left unescaped.
pub struct JsonWriteTool;

impl JsonWriteTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonWriteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for JsonWriteTool {
    fn name(&self) -> &str {
        "write_json"
    }

    fn description(&self) -> &str {
        "Write a JSON object to a file on disk, replacing any existing content."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Destination file path"
                },
                "data": {
                    "type": "object",
                    "description": "JSON object to serialize"
                }
            },
            "required": ["path", "data"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let Some(path) = args.get("path").and_then(|v| v.as_str()) else {
            return Ok(ToolErrorKind::MissingArgument("path").into());
        };
        let Some(data) = args.get("data") else {
            return Ok(ToolErrorKind::MissingArgument("data").into());
        };

        let serialized = match serde_json::to_string_pretty(data) {
            Ok(text) => text,
            Err(e) => {
                return Ok(ToolErrorKind::Write {
                    path: path.to_string(),
                    detail: e.to_string(),
                }
                .into());
            }
        };

        match tokio::fs::write(path, &serialized).await {
            Ok(()) => {
                tracing::debug!(path, chars = serialized.chars().count(), "wrote JSON file");
                Ok(ToolResult::ok(format!(
                    "Successfully wrote JSON data to '{path}' ({} characters).",
                    serialized.chars().count()
                )))
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "JSON write failed");
                Ok(ToolErrorKind::Write {
                    path: path.to_string(),
                    detail: e.to_string(),
                }
                .into())
            }
        }
    }
}
