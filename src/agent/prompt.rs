//! System prompt for the DataGen assistant.

use crate::tools::Tool;

/// Build the fixed system instruction, listing the registered tools.
///
/// The clarification rule for "those users" exists because the durable
/// history keeps only message text: the model cannot recover the concrete
/// records from an earlier turn and must ask the user to restate them.
pub fn build_system_prompt(tools: &[Box<dyn Tool>]) -> String {
    let tool_lines = tools
        .iter()
        .map(|t| format!("- {}: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are DataGen, a helpful assistant that generates sample data for applications.\n\
         \n\
         Available tools:\n\
         {tool_lines}\n\
         \n\
         To generate users, use the 'generate_user_data' tool. \
         To save data to a file, use the 'write_json' tool. \
         To read data from a file, use the 'read_json' tool. \
         If the user refers to 'those users' from a previous request, \
         ask them to specify the details again."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_tools;

    #[test]
    fn prompt_names_every_default_tool() {
        let prompt = build_system_prompt(&default_tools());
        assert!(prompt.contains("generate_user_data"));
        assert!(prompt.contains("write_json"));
        assert!(prompt.contains("read_json"));
    }

    #[test]
    fn prompt_keeps_persona_and_clarification_rule() {
        let prompt = build_system_prompt(&default_tools());
        assert!(prompt.starts_with("You are DataGen"));
        assert!(prompt.contains("those users"));
    }
}
