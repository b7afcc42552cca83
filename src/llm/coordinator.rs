//! Generic Tool Coordinator for Multi-Turn Tool Calling
//!
//! This module provides a provider-agnostic `ToolCoordinator` that works with any
//! `LLMClient` implementation. It handles the complete tool calling loop:
//!
//! 1. Send the conversation with available tools to the LLM
//! 2. If the model requests tool calls, execute them
//! 3. Send tool results back to the model
//! 4. Repeat until the model answers without tool calls
//!
//! Tool failures never abort the loop: they are reported back to the model as
//! `{"error": ...}` results so it can narrate around them. Only LLM transport
//! failures and running out of iterations are errors.

use crate::llm::client::{LLMClient, TokenUsage};
use crate::tools::registry::ToolRegistry;
use crate::types::{AppError, Result, ToolCall};
use crate::utils::config::EngineConfig;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Configuration for tool calling coordination behavior.
#[derive(Debug, Clone)]
pub struct ToolCallingConfig {
    /// Maximum number of LLM iterations (not tool calls) before giving up.
    pub max_iterations: usize,

    /// Whether to execute multiple tool calls from one turn in parallel.
    pub parallel_execution: bool,

    /// Timeout for individual tool execution.
    pub tool_timeout: Duration,
}

impl Default for ToolCallingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            parallel_execution: false,
            tool_timeout: Duration::from_secs(300),
        }
    }
}

impl From<&EngineConfig> for ToolCallingConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            parallel_execution: config.parallel_tools,
            tool_timeout: Duration::from_secs(config.tool_timeout_secs),
        }
    }
}

/// Record of a single tool call execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Unique identifier for this tool call (from the LLM).
    pub id: String,
    /// Name of the tool that was called.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: serde_json::Value,
    /// Result returned by the tool (or error object).
    pub result: serde_json::Value,
    /// Whether the tool execution was successful.
    pub success: bool,
    /// Time taken to execute the tool in milliseconds.
    pub duration_ms: u64,
    /// Error message if the tool failed.
    pub error: Option<String>,
}

/// A message in a tool-calling conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The text content of the message.
    pub content: String,
    /// Tool calls requested by the assistant (only for Assistant role).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Tool result content (only for Tool role).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Role of a message sender in a tool-calling conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl ConversationMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create an assistant message with optional tool calls.
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, result: &serde_json::Value) -> Self {
        Self {
            role: MessageRole::Tool,
            content: result.to_string(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Result of a complete tool coordination session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorResult {
    /// Final text response from the model.
    pub content: String,

    /// All tool calls made during the session.
    pub tool_calls: Vec<ToolCallRecord>,

    /// Number of LLM iterations (round-trips) performed.
    pub iterations: usize,

    /// Accumulated token usage across all iterations.
    pub total_usage: TokenUsage,

    /// Full message history (useful for debugging).
    pub message_history: Vec<ConversationMessage>,
}

/// Generic tool coordinator that works with any LLMClient.
pub struct ToolCoordinator {
    client: Arc<dyn LLMClient>,
    registry: Arc<ToolRegistry>,
    config: ToolCallingConfig,
}

impl ToolCoordinator {
    /// Create a new ToolCoordinator with the given client, registry, and config.
    pub fn new(
        client: Arc<dyn LLMClient>,
        registry: Arc<ToolRegistry>,
        config: ToolCallingConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    /// Create a new ToolCoordinator with default configuration.
    pub fn with_defaults(client: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        Self::new(client, registry, ToolCallingConfig::default())
    }

    /// Execute a complete tool-calling conversation loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or the model is still requesting
    /// tools after `max_iterations` round-trips.
    pub async fn execute(&self, system: Option<&str>, prompt: &str) -> Result<CoordinatorResult> {
        let tools = self.registry.get_tool_definitions();
        let mut messages: Vec<ConversationMessage> = Vec::new();
        let mut all_tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut total_usage = TokenUsage::default();

        if let Some(sys) = system {
            messages.push(ConversationMessage::system(sys));
        }
        messages.push(ConversationMessage::user(prompt));

        for iteration in 0..self.config.max_iterations {
            let response = self
                .client
                .generate_with_tools_and_history(&messages, &tools)
                .await?;

            if let Some(usage) = response.usage {
                total_usage = total_usage.add(usage);
            }

            messages.push(ConversationMessage::assistant(
                &response.content,
                response.tool_calls.clone(),
            ));

            if response.tool_calls.is_empty() {
                return Ok(CoordinatorResult {
                    content: response.content,
                    tool_calls: all_tool_calls,
                    iterations: iteration + 1,
                    total_usage,
                    message_history: messages,
                });
            }

            tracing::debug!(
                iteration = iteration + 1,
                calls = response.tool_calls.len(),
                "model requested tool calls"
            );

            let tool_results = self.execute_tool_calls(&response.tool_calls).await;

            for record in tool_results {
                messages.push(ConversationMessage::tool_result(&record.id, &record.result));
                all_tool_calls.push(record);
            }
        }

        Err(AppError::LLM(format!(
            "model did not produce a final answer within {} iterations",
            self.config.max_iterations
        )))
    }

    async fn execute_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolCallRecord> {
        if self.config.parallel_execution {
            join_all(calls.iter().map(|call| self.execute_single_tool(call))).await
        } else {
            let mut records = Vec::with_capacity(calls.len());
            for call in calls {
                records.push(self.execute_single_tool(call).await);
            }
            records
        }
    }

    /// Execute a single tool call with timeout. Failures become error records.
    async fn execute_single_tool(&self, call: &ToolCall) -> ToolCallRecord {
        let start = Instant::now();

        let result = timeout(
            self.config.tool_timeout,
            self.registry.execute(&call.name, call.arguments.clone()),
        )
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        let (result, error) = match result {
            Ok(Ok(value)) => (value, None),
            Ok(Err(e)) => (serde_json::json!({"error": e.to_string()}), Some(e.to_string())),
            Err(_) => (
                serde_json::json!({"error": "Tool execution timed out"}),
                Some("Tool execution timed out".to_string()),
            ),
        };

        if let Some(err) = &error {
            tracing::warn!(tool = %call.name, error = %err, "tool call failed");
        }

        ToolCallRecord {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            success: error.is_none(),
            result,
            duration_ms,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LLMResponse;
    use crate::tools::registry::Tool;
    use crate::types::ToolDefinition;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Replays a fixed list of responses, one per call.
    struct ScriptedClient {
        responses: Mutex<Vec<LLMResponse>>,
        seen: Mutex<Vec<Vec<ConversationMessage>>>,
    }

    impl ScriptedClient {
        fn new(mut responses: Vec<LLMResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate_with_tools_and_history(
            &self,
            messages: &[ConversationMessage],
            _tools: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AppError::LLM("script exhausted".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn execute(&self, args: Value) -> Result<Value> {
            Ok(json!({"echo": args}))
        }
    }

    fn reply(content: &str, tool_calls: Vec<ToolCall>) -> LLMResponse {
        LLMResponse {
            content: content.to_string(),
            finish_reason: if tool_calls.is_empty() { "stop" } else { "tool_calls" }.to_string(),
            tool_calls,
            usage: Some(TokenUsage::new(10, 5)),
        }
    }

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: json!({"x": 1}),
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_final_answer_without_tools() {
        let client = Arc::new(ScriptedClient::new(vec![reply("done", vec![])]));
        let coordinator = ToolCoordinator::with_defaults(client, registry());

        let result = coordinator.execute(Some("sys"), "hello").await.unwrap();
        assert_eq!(result.content, "done");
        assert_eq!(result.iterations, 1);
        assert!(result.tool_calls.is_empty());
        assert_eq!(result.message_history[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn test_tool_results_are_fed_back() {
        let client = Arc::new(ScriptedClient::new(vec![
            reply("", vec![call("c1", "echo")]),
            reply("answer", vec![]),
        ]));
        let coordinator = ToolCoordinator::with_defaults(client.clone(), registry());

        let result = coordinator.execute(None, "hello").await.unwrap();
        assert_eq!(result.content, "answer");
        assert_eq!(result.iterations, 2);
        assert_eq!(result.tool_calls.len(), 1);
        assert!(result.tool_calls[0].success);
        assert_eq!(result.total_usage, TokenUsage::new(20, 10));

        let second_turn = &client.seen.lock().unwrap()[1];
        let tool_message = second_turn.last().unwrap();
        assert_eq!(tool_message.role, MessageRole::Tool);
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("c1"));
        assert!(tool_message.content.contains("echo"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let client = Arc::new(ScriptedClient::new(vec![
            reply("", vec![call("c1", "missing")]),
            reply("recovered", vec![]),
        ]));
        let coordinator = ToolCoordinator::with_defaults(client, registry());

        let result = coordinator.execute(None, "hello").await.unwrap();
        assert_eq!(result.content, "recovered");
        assert!(!result.tool_calls[0].success);
        assert!(result.tool_calls[0].error.as_ref().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn test_max_iterations_is_an_error() {
        let client = Arc::new(ScriptedClient::new(vec![
            reply("", vec![call("c1", "echo")]),
            reply("", vec![call("c2", "echo")]),
        ]));
        let config = ToolCallingConfig {
            max_iterations: 2,
            ..ToolCallingConfig::default()
        };
        let coordinator = ToolCoordinator::new(client, registry(), config);

        let err = coordinator.execute(None, "hello").await.unwrap_err();
        assert!(err.to_string().contains("2 iterations"));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let coordinator = ToolCoordinator::with_defaults(client, registry());
        assert!(coordinator.execute(None, "hello").await.is_err());
    }

    #[test]
    fn test_config_from_engine_section() {
        let engine = EngineConfig {
            max_iterations: 4,
            tool_timeout_secs: 60,
            parallel_tools: true,
        };
        let config = ToolCallingConfig::from(&engine);
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.tool_timeout, Duration::from_secs(60));
        assert!(config.parallel_execution);
    }
}
