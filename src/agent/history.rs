//! Append-only conversation history.

use crate::providers::ChatMessage;

/// Ordered record of every completed turn in the current process lifetime.
///
/// Entries are only ever appended, never mutated, truncated, or reordered; a
/// completed turn contributes exactly one user and one assistant entry. The
/// full history is re-supplied to the provider on every turn.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    entries: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(ChatMessage::assistant(content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn appends_preserve_order() {
        let mut history = ConversationHistory::new();
        history.push_user("first");
        history.push_assistant("second");
        history.push_user("third");

        let roles: Vec<&str> = history
            .messages()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, ["user", "assistant", "user"]);
        assert_eq!(history.messages()[2].content, "third");
    }
}
