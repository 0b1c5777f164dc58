//! Provider trait and wire-level chat types.

use crate::tools::ToolSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A plain role/content message pair. This is the shape the conversation
/// history stores: `role` is `"user"` or `"assistant"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A single tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON argument string, exactly as the model produced it.
    pub arguments: String,
}

/// The result of one tool invocation, fed back to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResultMessage {
    pub call_id: String,
    pub name: String,
    pub output: String,
}

/// One entry in the working message set sent to a provider.
///
/// The durable conversation history only ever contains `Chat` entries; the
/// tool-call and tool-result variants exist within a single agent turn and
/// are discarded once the model produces its final text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConversationMessage {
    Chat(ChatMessage),
    /// An assistant turn that requested tool calls, with optional
    /// accompanying text.
    ToolCalls {
        text: Option<String>,
        calls: Vec<ToolCall>,
    },
    ToolResult(ToolResultMessage),
}

impl From<ChatMessage> for ConversationMessage {
    fn from(message: ChatMessage) -> Self {
        Self::Chat(message)
    }
}

/// A chat request: system prompt, working message set, and the tool surface
/// the model may call into.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: Option<&'a str>,
    pub messages: &'a [ConversationMessage],
    pub tools: &'a [ToolSpec],
}

/// A provider response: final text, tool calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A model inference backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run one chat completion over the given request.
    async fn chat(
        &self,
        request: ChatRequest<'_>,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<ChatResponse>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_constructors_set_roles() {
        assert_eq!(ChatMessage::user("hi").role, "user");
        assert_eq!(ChatMessage::assistant("hello").role, "assistant");
    }

    #[test]
    fn chat_message_round_trips_through_serde() {
        let msg = ChatMessage::user("generate 5 users");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn chat_response_reports_tool_calls() {
        let empty = ChatResponse::default();
        assert!(!empty.has_tool_calls());

        let with_calls = ChatResponse {
            text: None,
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: "read_json".into(),
                arguments: r#"{"path":"users.json"}"#.into(),
            }],
        };
        assert!(with_calls.has_tool_calls());
    }

    #[test]
    fn conversation_message_from_chat_message() {
        let entry: ConversationMessage = ChatMessage::assistant("done").into();
        match entry {
            ConversationMessage::Chat(msg) => assert_eq!(msg.content, "done"),
            other => panic!("expected chat entry, got {other:?}"),
        }
    }
}
