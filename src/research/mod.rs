//! Deep Research Backend Integration
//!
//! This module connects agents to an external deep-research service that
//! crawls the web, analyzes what it finds and returns a written analysis with
//! its sources.
//!
//! # Architecture
//!
//! - [`ResearchProvider`] - Trait implemented by research backends
//! - [`firecrawl::FirecrawlClient`] - Firecrawl deep-research API client
//! - [`adapter::ResearchToolAdapter`] - Normalizes every provider outcome into
//!   a [`ResearchResult`](crate::types::ResearchResult); provider errors never
//!   cross this boundary
//!
//! # Usage
//!
//! ```ignore
//! use deepscribe::research::{adapter::ResearchToolAdapter, firecrawl::FirecrawlClient};
//!
//! let provider = Arc::new(FirecrawlClient::from_config(&config.research, &credentials)?);
//! let adapter = ResearchToolAdapter::new(provider);
//!
//! let request = ResearchRequest::new("quantum error correction", 3, 180, 10)?;
//! let on_activity: ActivityCallback = Arc::new(|event: &ActivityEvent| println!("[{}] {}", event.kind, event.message));
//! match adapter.run(&request, Some(&on_activity)).await {
//!     ResearchResult::Success { analysis, sources } => println!("{} ({} sources)", analysis, sources.len()),
//!     ResearchResult::Failure { error_message } => eprintln!("research failed: {}", error_message),
//! }
//! ```

/// Normalization boundary between agents and the research backend.
pub mod adapter;
/// Firecrawl deep-research client.
pub mod firecrawl;

use crate::types::{ActivityEvent, ResearchRequest, Result, SourceRecord};
use async_trait::async_trait;
use std::sync::Arc;

pub use adapter::ResearchToolAdapter;
pub use firecrawl::FirecrawlClient;

/// Observer for intermediate crawl activity.
///
/// Invoked synchronously while the provider call is in flight, so it must
/// return quickly.
pub type ActivityCallback = Arc<dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync>;

/// Raw successful outcome of a provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResearch {
    pub final_analysis: String,
    pub sources: Vec<SourceRecord>,
}

/// A deep-research backend.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Run one research job to completion, reporting activity in
    /// chronological order through `on_activity`.
    async fn deep_research(
        &self,
        request: &ResearchRequest,
        on_activity: &(dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync),
    ) -> Result<ProviderResearch>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}
