//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the chat-completion backend
//! that executes agents:
//! - **OpenAI**: chat completions with tool calling
//! - **Ollama**: local inference through its OpenAI-compatible `/v1` route

use crate::llm::coordinator::ConversationMessage;
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use crate::utils::config::{Credentials, LlmConfig, LlmProviderKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ConversationMessage::system(system));
        }
        messages.push(ConversationMessage::user(prompt));
        let response = self.generate_with_tools_and_history(&messages, &[]).await?;
        Ok(response.content)
    }

    /// Generate the next assistant turn for a full conversation, offering `tools`
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
    /// Token usage reported by the provider, when available
    pub usage: Option<TokenUsage>,
}

/// Token accounting for one or more completions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Sum of two usage records
    pub fn add(self, other: TokenUsage) -> Self {
        Self::new(
            self.prompt_tokens + other.prompt_tokens,
            self.completion_tokens + other.completion_tokens,
        )
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },

    /// Ollama local LLM provider, reached through `{base_url}/v1`
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Resolve the provider described by `[llm]` using explicit credentials
    pub fn from_config(config: &LlmConfig, credentials: &Credentials) -> Result<Self> {
        match config.provider {
            LlmProviderKind::OpenAI => {
                let api_key = credentials.llm_key.clone().ok_or_else(|| {
                    AppError::Configuration(format!(
                        "OpenAI provider requires an API key (set {})",
                        config.api_key_env
                    ))
                })?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: config.api_base.clone(),
                    model: config.model.clone(),
                })
            }
            LlmProviderKind::Ollama => Ok(Provider::Ollama {
                base_url: config.api_base.clone(),
                model: config.model.clone(),
            }),
        }
    }

    /// Create a client instance for this provider
    pub fn create_client(&self, params: ModelParams) -> Box<dyn LLMClient> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Box::new(super::openai::OpenAIClient::with_params(
                Some(api_key.clone()),
                api_base.clone(),
                model.clone(),
                params,
            )),
            Provider::Ollama { base_url, model } => {
                let api_base = format!("{}/v1", base_url.trim_end_matches('/'));
                Box::new(super::openai::OpenAIClient::with_params(
                    None,
                    api_base,
                    model.clone(),
                    params,
                ))
            }
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier requested from the provider
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Inference parameters forwarded with every request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModelParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Configuration-based client factory
///
/// Holds the resolved provider and parameters so every agent in a pipeline
/// talks to the same backend.
pub struct LLMClientFactory {
    default_provider: Provider,
    params: ModelParams,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider, params: ModelParams) -> Self {
        Self {
            default_provider,
            params,
        }
    }

    /// Build the factory straight from `[llm]` and the resolved credentials
    pub fn from_config(config: &LlmConfig, credentials: &Credentials) -> Result<Self> {
        let provider = Provider::from_config(config, credentials)?;
        Ok(Self::new(
            provider,
            ModelParams {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
        ))
    }

    /// Create a client using the default provider
    pub fn create_default(&self) -> Box<dyn LLMClient> {
        self.default_provider.create_client(self.params)
    }

    /// Get a reference to the default provider
    pub fn default_provider(&self) -> &Provider {
        &self.default_provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: LlmProviderKind) -> LlmConfig {
        LlmConfig {
            provider,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_provider_name() {
        let openai = Provider::OpenAI {
            api_key: "".to_string(),
            api_base: "".to_string(),
            model: "gpt-4o-mini".to_string(),
        };
        assert_eq!(openai.name(), "OpenAI");
        assert_eq!(openai.model(), "gpt-4o-mini");

        let ollama = Provider::Ollama {
            base_url: "".to_string(),
            model: "llama3.2".to_string(),
        };
        assert_eq!(ollama.name(), "Ollama");
    }

    #[test]
    fn test_openai_requires_key() {
        let config = llm_config(LlmProviderKind::OpenAI);
        let err = Provider::from_config(&config, &Credentials::default()).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let credentials = Credentials {
            llm_key: Some("sk-test".to_string()),
            research_provider_key: None,
        };
        let provider = Provider::from_config(&config, &credentials).unwrap();
        assert_eq!(provider.name(), "OpenAI");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = llm_config(LlmProviderKind::Ollama);
        let provider = Provider::from_config(&config, &Credentials::default()).unwrap();
        assert_eq!(provider.name(), "Ollama");

        let factory = LLMClientFactory::new(provider, ModelParams::default());
        let client = factory.create_default();
        assert_eq!(client.model_name(), config.model);
    }

    #[test]
    fn test_token_usage_add() {
        let total = TokenUsage::new(10, 5).add(TokenUsage::new(3, 2));
        assert_eq!(total, TokenUsage::new(13, 7));
        assert_eq!(total.total_tokens, 20);
    }
}
