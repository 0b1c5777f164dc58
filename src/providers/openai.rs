//! OpenAI chat-completions provider with native function calling.

use super::traits::{
    ChatRequest, ChatResponse, ConversationMessage, Provider, ToolCall as ProviderToolCall,
};
use crate::tools::ToolSpec;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(None, api_key)
    }

    pub fn with_base_url(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let base = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Self {
            base_url: base.trim_end_matches('/').to_string(),
            api_key: api_key.map(ToString::to_string),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Build the full URL for chat completions, detecting if base_url already
    /// includes the path. This allows custom endpoints that are configured
    /// with the complete route.
    fn chat_completions_url(&self) -> String {
        let has_full_endpoint = reqwest::Url::parse(&self.base_url)
            .map(|url| {
                url.path()
                    .trim_end_matches('/')
                    .ends_with("/chat/completions")
            })
            .unwrap_or_else(|_| {
                self.base_url
                    .trim_end_matches('/')
                    .ends_with("/chat/completions")
            });

        if has_full_endpoint {
            self.base_url.clone()
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ApiToolDef>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ApiMessage {
    fn plain(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiToolDef {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ApiFunctionDef,
}

#[derive(Debug, Serialize)]
struct ApiFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<&ToolSpec> for ApiToolDef {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            kind: "function",
            function: ApiFunctionDef {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ApiToolCall>>,
}

fn to_api_messages(
    system_prompt: Option<&str>,
    messages: &[ConversationMessage],
) -> Vec<ApiMessage> {
    let mut api_messages = Vec::with_capacity(messages.len() + 1);

    if let Some(sys) = system_prompt {
        api_messages.push(ApiMessage::plain("system", sys));
    }

    for entry in messages {
        match entry {
            ConversationMessage::Chat(msg) => {
                api_messages.push(ApiMessage::plain(&msg.role, &msg.content));
            }
            ConversationMessage::ToolCalls { text, calls } => {
                api_messages.push(ApiMessage {
                    role: "assistant".to_string(),
                    content: text.clone(),
                    tool_calls: Some(
                        calls
                            .iter()
                            .map(|call| ApiToolCall {
                                id: Some(call.id.clone()),
                                kind: "function".to_string(),
                                function: ApiFunctionCall {
                                    name: call.name.clone(),
                                    arguments: Some(call.arguments.clone()),
                                },
                            })
                            .collect(),
                    ),
                    tool_call_id: None,
                });
            }
            ConversationMessage::ToolResult(result) => {
                api_messages.push(ApiMessage {
                    role: "tool".to_string(),
                    content: Some(result.output.clone()),
                    tool_calls: None,
                    tool_call_id: Some(result.call_id.clone()),
                });
            }
        }
    }

    api_messages
}

fn from_response_message(message: ResponseMessage) -> ChatResponse {
    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ProviderToolCall {
            id: tc
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: tc.function.name,
            arguments: tc.function.arguments.unwrap_or_else(|| "{}".to_string()),
        })
        .collect();

    ChatResponse {
        text: message.content.filter(|c| !c.trim().is_empty()),
        tool_calls,
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn chat(
        &self,
        request: ChatRequest<'_>,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<ChatResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "OpenAI API key not set. Set OPENAI_API_KEY or api_key in config.toml."
            )
        })?;

        let tools: Vec<ApiToolDef> = request.tools.iter().map(ApiToolDef::from).collect();
        let api_request = ApiChatRequest {
            model: model.to_string(),
            messages: to_api_messages(request.system_prompt, request.messages),
            temperature,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        let url = self.chat_completions_url();
        tracing::debug!(%url, model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&api_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(super::api_error(self.name(), response).await);
        }

        let chat_response: ApiChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| from_response_message(c.message))
            .ok_or_else(|| anyhow::anyhow!("No response from {}", self.name()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::traits::{ChatMessage, ToolCall, ToolResultMessage};

    #[test]
    fn creates_with_default_base_url() {
        let p = OpenAiProvider::new(Some("sk-test"));
        assert_eq!(p.base_url, "https://api.openai.com/v1");
        assert_eq!(p.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn strips_trailing_slash() {
        let p = OpenAiProvider::with_base_url(Some("https://example.com/v1/"), None);
        assert_eq!(p.base_url, "https://example.com/v1");
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let p = OpenAiProvider::with_base_url(Some("   "), None);
        assert_eq!(p.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn chat_completions_url_appends_path() {
        let p = OpenAiProvider::with_base_url(Some("https://example.com/v1"), None);
        assert_eq!(
            p.chat_completions_url(),
            "https://example.com/v1/chat/completions"
        );
    }

    #[test]
    fn chat_completions_url_detects_full_endpoint() {
        let p = OpenAiProvider::with_base_url(
            Some("https://example.com/api/v3/chat/completions"),
            None,
        );
        assert_eq!(
            p.chat_completions_url(),
            "https://example.com/api/v3/chat/completions"
        );
    }

    #[tokio::test]
    async fn chat_fails_without_key() {
        let p = OpenAiProvider::new(None);
        let messages = [ConversationMessage::Chat(ChatMessage::user("hello"))];
        let result = p
            .chat(
                ChatRequest {
                    system_prompt: None,
                    messages: &messages,
                    tools: &[],
                },
                "gpt-4o-mini",
                0.0,
            )
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not set"));
    }

    #[test]
    fn request_serializes_tools_when_present() {
        let spec = ToolSpec {
            name: "read_json".into(),
            description: "Read a JSON file".into(),
            parameters: serde_json::json!({"type": "object", "properties": {}}),
        };
        let req = ApiChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ApiMessage::plain("user", "hello")],
            temperature: 0.0,
            tools: Some(vec![ApiToolDef::from(&spec)]),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""tools":[{"type":"function""#));
        assert!(json.contains("read_json"));
    }

    #[test]
    fn request_omits_empty_tools() {
        let req = ApiChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: 0.0,
            tools: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("tools"));
    }

    #[test]
    fn working_set_maps_to_wire_messages() {
        let messages = vec![
            ConversationMessage::Chat(ChatMessage::user("save those users")),
            ConversationMessage::ToolCalls {
                text: None,
                calls: vec![ToolCall {
                    id: "call_1".into(),
                    name: "write_json".into(),
                    arguments: r#"{"path":"users.json","data":{}}"#.into(),
                }],
            },
            ConversationMessage::ToolResult(ToolResultMessage {
                call_id: "call_1".into(),
                name: "write_json".into(),
                output: "Successfully wrote JSON data to 'users.json' (2 characters).".into(),
            }),
        ];

        let api = to_api_messages(Some("You are DataGen."), &messages);
        assert_eq!(api.len(), 4);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");
        assert_eq!(api[2].role, "assistant");
        assert!(api[2].tool_calls.is_some());
        assert_eq!(api[3].role, "tool");
        assert_eq!(api[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn response_with_content_deserializes() {
        let json = r#"{"choices":[{"message":{"content":"Here are your users."}}]}"#;
        let resp: ApiChatResponse = serde_json::from_str(json).unwrap();
        let mapped = from_response_message(resp.choices.into_iter().next().unwrap().message);
        assert_eq!(mapped.text.as_deref(), Some("Here are your users."));
        assert!(!mapped.has_tool_calls());
    }

    #[test]
    fn response_with_tool_calls_deserializes() {
        let json = r#"{"choices":[{"message":{"content":null,"tool_calls":[
            {"id":"call_9","type":"function","function":{"name":"generate_user_data","arguments":"{}"}}
        ]}}]}"#;
        let resp: ApiChatResponse = serde_json::from_str(json).unwrap();
        let mapped = from_response_message(resp.choices.into_iter().next().unwrap().message);
        assert!(mapped.text.is_none());
        assert_eq!(mapped.tool_calls.len(), 1);
        assert_eq!(mapped.tool_calls[0].id, "call_9");
        assert_eq!(mapped.tool_calls[0].name, "generate_user_data");
        assert_eq!(mapped.tool_calls[0].arguments, "{}");
    }

    #[test]
    fn missing_tool_call_id_is_backfilled() {
        let message = ResponseMessage {
            content: None,
            tool_calls: Some(vec![ApiToolCall {
                id: None,
                kind: "function".into(),
                function: ApiFunctionCall {
                    name: "read_json".into(),
                    arguments: None,
                },
            }]),
        };
        let mapped = from_response_message(message);
        assert!(!mapped.tool_calls[0].id.is_empty());
        assert_eq!(mapped.tool_calls[0].arguments, "{}");
    }

    #[test]
    fn response_empty_choices() {
        let json = r#"{"choices":[]}"#;
        let resp: ApiChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.choices.is_empty());
    }
}
