//! Interactive conversation loop and single-turn agent runner.

use anyhow::Result;
use std::io::Write as _;
use tokio::io::AsyncBufReadExt;

use super::dispatcher::dispatch_tool_call;
use super::history::ConversationHistory;
use super::prompt::build_system_prompt;
use crate::config::Config;
use crate::providers::{self, ChatMessage, ChatRequest, ConversationMessage, Provider};
use crate::tools::{self, Tool, ToolSpec};

/// One chat session: a provider, the tool registry, and the accumulated
/// conversation history.
pub struct AgentSession {
    provider: Box<dyn Provider>,
    tools: Vec<Box<dyn Tool>>,
    specs: Vec<ToolSpec>,
    system_prompt: String,
    model: String,
    temperature: f64,
    max_tool_iterations: usize,
    history: ConversationHistory,
}

impl AgentSession {
    pub fn new(
        provider: Box<dyn Provider>,
        tools: Vec<Box<dyn Tool>>,
        model: String,
        temperature: f64,
        max_tool_iterations: usize,
    ) -> Self {
        let specs = tools::tool_specs(&tools);
        let system_prompt = build_system_prompt(&tools);
        Self {
            provider,
            tools,
            specs,
            system_prompt,
            model,
            temperature,
            max_tool_iterations,
            history: ConversationHistory::new(),
        }
    }

    /// Run one turn: delegate the input with the full history, record exactly
    /// one user and one assistant entry, and return the assistant text.
    ///
    /// Delegation failures are converted into a visible assistant message so
    /// the loop always continues.
    pub async fn turn(&mut self, input: &str) -> String {
        let response = match self.invoke(input).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "agent delegation failed");
                format!("Error during agent execution: {e}")
            }
        };

        self.history.push_user(input);
        self.history.push_assistant(&response);
        response
    }

    /// The collaborator contract: full history plus the current input, the
    /// tool surface, the fixed system instruction, and a step ceiling.
    async fn invoke(&self, input: &str) -> Result<String> {
        let mut working: Vec<ConversationMessage> = self
            .history
            .messages()
            .iter()
            .cloned()
            .map(Into::into)
            .collect();
        working.push(ChatMessage::user(input).into());

        for step in 0..self.max_tool_iterations {
            let response = self
                .provider
                .chat(
                    ChatRequest {
                        system_prompt: Some(&self.system_prompt),
                        messages: &working,
                        tools: &self.specs,
                    },
                    &self.model,
                    self.temperature,
                )
                .await?;

            if response.has_tool_calls() {
                tracing::debug!(step, count = response.tool_calls.len(), "executing tool calls");
                let calls = response.tool_calls.clone();
                working.push(ConversationMessage::ToolCalls {
                    text: response.text,
                    calls: calls.clone(),
                });
                for call in &calls {
                    let result = dispatch_tool_call(&self.tools, call).await;
                    working.push(ConversationMessage::ToolResult(result));
                }
                continue;
            }

            if let Some(text) = response.text {
                return Ok(text);
            }

            anyhow::bail!("provider returned an empty response");
        }

        anyhow::bail!(
            "step limit ({}) reached without a final response",
            self.max_tool_iterations
        )
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}

/// True when the input terminates the loop (`exit`/`quit`, any case).
pub fn is_exit_command(input: &str) -> bool {
    matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "exit" | "quit"
    )
}

/// Outcome of one line of user input.
pub enum LoopAction {
    Exit,
    Reply(String),
}

/// Process one line: exit keywords short-circuit before any provider call.
pub async fn handle_line(session: &mut AgentSession, line: &str) -> LoopAction {
    if is_exit_command(line) {
        return LoopAction::Exit;
    }
    LoopAction::Reply(session.turn(line).await)
}

/// Entry point for `datagen agent`.
///
/// With `message` set, runs a single turn and returns the reply; otherwise
/// enters the interactive loop until `exit`/`quit` or end of input.
pub async fn run(
    config: Config,
    message: Option<String>,
    provider_override: Option<String>,
    model_override: Option<String>,
    temperature: Option<f64>,
) -> Result<Option<String>> {
    let provider_name = provider_override
        .or_else(|| config.default_provider.clone())
        .unwrap_or_else(|| "openai".to_string());
    let provider = providers::create_provider_with_url(
        &provider_name,
        config.api_key.as_deref(),
        config.api_url.as_deref(),
    )?;
    let model = model_override
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| "gpt-4o-mini".to_string());
    let temperature = temperature.unwrap_or(config.default_temperature);

    tracing::info!(provider = %provider_name, %model, "agent session starting");

    let mut session = AgentSession::new(
        provider,
        tools::default_tools(),
        model,
        temperature,
        config.agent.max_tool_iterations,
    );

    if let Some(message) = message {
        let reply = session.turn(&message).await;
        println!("{reply}");
        return Ok(Some(reply));
    }

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("User: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            // Stdin closed: treat like an explicit exit.
            println!();
            println!("Exiting...");
            return Ok(None);
        };

        match handle_line(&mut session, &line).await {
            LoopAction::Exit => {
                println!("Exiting...");
                return Ok(None);
            }
            LoopAction::Reply(reply) => println!("AI: {reply}"),
        }
    }
}
