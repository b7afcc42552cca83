//! OpenAI-compatible chat completions client
//!
//! Speaks the `/chat/completions` wire format directly over `reqwest`, which
//! also covers Ollama's OpenAI-compatible endpoint.

use crate::llm::client::{LLMClient, LLMResponse, ModelParams, TokenUsage};
use crate::llm::coordinator::{ConversationMessage, MessageRole};
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
    params: ModelParams,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self::with_params(Some(api_key), api_base, model, ModelParams::default())
    }

    pub fn with_params(
        api_key: Option<String>,
        api_base: String,
        model: String,
        params: ModelParams,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            params,
        }
    }

    fn convert_message(message: &ConversationMessage) -> WireMessage {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        };

        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(
                message
                    .tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        r#type: "function".to_string(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.to_string(),
                        },
                    })
                    .collect(),
            )
        };

        // Assistant turns that only carry tool calls are sent with a null content
        let content = if message.role == MessageRole::Assistant
            && message.content.is_empty()
            && tool_calls.is_some()
        {
            None
        } else {
            Some(message.content.clone())
        };

        WireMessage {
            role: role.to_string(),
            content,
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }

    fn convert_tool(tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            }
        })
    }

    fn build_body(&self, messages: &[ConversationMessage], tools: &[ToolDefinition]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages.iter().map(Self::convert_message).collect::<Vec<_>>(),
        });

        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.iter().map(Self::convert_tool).collect());
            body["tool_choice"] = json!("auto");
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let url = format!("{}/chat/completions", self.api_base);
        let mut request = self.http.post(&url).json(&self.build_body(messages, tools));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI API returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Malformed OpenAI response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = match serde_json::from_str(&call.function.arguments) {
                    Ok(arguments) => arguments,
                    Err(e) => {
                        tracing::warn!(
                            tool = %call.function.name,
                            error = %e,
                            "tool call arguments are not valid JSON"
                        );
                        Value::String(call.function.arguments)
                    }
                };
                ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments,
                }
            })
            .collect();

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "unknown".to_string()),
            usage: completion
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============= Wire Types =============

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(default = "default_tool_type")]
    r#type: String,
    function: WireFunctionCall,
}

fn default_tool_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
