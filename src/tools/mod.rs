//! Tool subsystem for agent-callable capabilities.
//!
//! This module implements the tool execution surface exposed to the LLM
//! during agentic loops. Each tool implements the [`Tool`] trait defined in
//! [`traits`], which requires a name, description, JSON parameter schema, and
//! an async `execute` method returning a structured [`ToolResult`].
//!
//! Tools are assembled into a registry by [`default_tools`] (JSON file
//! write/read, synthetic user generation).
//!
//! # Extension
//!
//! To add a new tool, implement [`Tool`] in a new submodule and register it
//! in [`default_tools`].

pub mod json_read;
pub mod json_write;
pub mod traits;
pub mod user_data;

pub use json_read::JsonReadTool;
pub use json_write::JsonWriteTool;
pub use traits::{Tool, ToolErrorKind, ToolResult, ToolSpec};
pub use user_data::{generate_users, GenerateUsersTool, UserRecord};

/// Create the default tool registry (3 essential tools).
pub fn default_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(JsonWriteTool::new()),
        Box::new(JsonReadTool::new()),
        Box::new(GenerateUsersTool::new()),
    ]
}

/// Tool specs for every tool in a registry, in registry order.
pub fn tool_specs(tools: &[Box<dyn Tool>]) -> Vec<ToolSpec> {
    tools.iter().map(|t| t.spec()).collect()
}
