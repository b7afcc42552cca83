//! # deepscribe - multi-agent deep research
//!
//! Turns a topic into a cited, credibility-checked research report by running
//! four LLM agents in sequence over the output of a deep-research crawler.
//!
//! ## Overview
//!
//! deepscribe can be used in two ways:
//!
//! 1. **As a CLI** - Run the `deepscribe` binary
//! 2. **As a library** - Embed [`ResearchPipeline`] in your own host
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use deepscribe::{Credentials, DeepscribeConfig, ResearchPipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeepscribeConfig::load(Path::new("deepscribe.toml"))?;
//!     let credentials = Credentials::from_env(&config);
//!
//!     let pipeline = ResearchPipeline::from_config(&config, &credentials, None)?;
//!     let document = pipeline
//!         .execute_research_pipeline("quantum error correction")
//!         .await?;
//!     println!("{}", document);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Observing a Run
//!
//! ```rust,ignore
//! use deepscribe::pipeline::{PipelineObserver, PipelineStage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl PipelineObserver for Printer {
//!     fn stage_started(&self, stage: PipelineStage) {
//!         println!("-> {}", stage);
//!     }
//! }
//!
//! let report = pipeline.with_observer(Arc::new(Printer)).execute(topic).await?;
//! for entry in report.credibility.entries() {
//!     println!("{} {}/10", entry.title, entry.credibility_score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`] - Stage sequencing, credibility parsing, report assembly
//! - [`agents`] - Agent definitions and the execution engine contract
//! - [`llm`] - LLM clients and the tool-calling loop
//! - [`research`] - Deep-research backend and its normalizing adapter
//! - [`tools`] - Tools agents can call
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and credentials

#![warn(rustdoc::missing_crate_level_docs)]

/// Agent definitions and execution.
pub mod agents;
/// Command-line interface for the `deepscribe` binary.
pub mod cli;
/// LLM provider clients and the tool-calling coordinator.
pub mod llm;
/// The four-stage research pipeline.
pub mod pipeline;
/// Deep-research backend integration.
pub mod research;
/// Tools exposed to agents.
pub mod tools;
/// Core types (requests, results, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{AgentRoster, AgentRunner, LlmAgentRunner};
pub use llm::{LLMClient, LLMClientFactory, LLMResponse, Provider};
pub use pipeline::{PipelineError, PipelineStage, ResearchPipeline, ResearchReport};
pub use research::{ResearchProvider, ResearchToolAdapter};
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Result};
pub use utils::config::{Credentials, DeepscribeConfig};
