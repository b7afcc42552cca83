//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the chat-completion backend
//! that runs every agent in the pipeline.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection resolved from `[llm]` config
//! - [`LLMClientFactory`] - Creates clients for the configured provider
//! - [`coordinator::ToolCoordinator`] - Multi-turn tool calling loop
//!
//! # Example
//!
//! ```ignore
//! use deepscribe::llm::{LLMClientFactory, LLMClient};
//!
//! let factory = LLMClientFactory::from_config(&config.llm, &credentials)?;
//! let client = factory.create_default();
//!
//! let response = client.generate("What is 2+2?").await?;
//! println!("{}", response);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Provider-agnostic multi-turn tool calling.
pub mod coordinator;
/// OpenAI-compatible chat completions over HTTP.
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, LLMResponse, ModelParams, Provider, TokenUsage};
pub use coordinator::{ConversationMessage, ToolCallingConfig, ToolCoordinator};
