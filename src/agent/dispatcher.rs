//! Tool-call dispatch for the agent loop.

use crate::providers::{ToolCall, ToolResultMessage};
use crate::tools::Tool;

/// Execute one model-requested tool call and render the string result the
/// model sees. Unknown tools, malformed argument JSON, and tool failures all
/// come back as descriptive text; dispatch never propagates an error.
pub async fn dispatch_tool_call(tools: &[Box<dyn Tool>], call: &ToolCall) -> ToolResultMessage {
    let output = execute_call(tools, call).await;
    tracing::debug!(tool = %call.name, id = %call.id, "tool call dispatched");

    ToolResultMessage {
        call_id: call.id.clone(),
        name: call.name.clone(),
        output,
    }
}

async fn execute_call(tools: &[Box<dyn Tool>], call: &ToolCall) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
        return format!("Unknown tool: '{}'", call.name);
    };

    let args: serde_json::Value = match serde_json::from_str(&call.arguments) {
        Ok(args) => args,
        Err(e) => {
            return format!(
                "Invalid arguments for tool '{}': {e}",
                call.name
            );
        }
    };

    match tool.execute(args).await {
        Ok(result) => result.render(),
        Err(e) => {
            tracing::warn!(tool = %call.name, error = %e, "tool execution failed");
            format!("Error executing tool '{}': {e}", call.name)
        }
    }
}
