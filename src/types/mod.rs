use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

// ============= Research Types =============

/// A single deep-research call, as issued by an agent through the research tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchRequest {
    query: String,
    crawl_depth: NonZeroU32,
    time_budget_secs: NonZeroU32,
    url_limit: NonZeroU32,
}

impl ResearchRequest {
    /// Build a request, rejecting an empty query or any non-positive limit.
    pub fn new(
        query: impl Into<String>,
        crawl_depth: u32,
        time_budget_secs: u32,
        url_limit: u32,
    ) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "research query must not be empty".to_string(),
            ));
        }

        let positive = |value: u32, field: &str| {
            NonZeroU32::new(value)
                .ok_or_else(|| AppError::InvalidInput(format!("{} must be positive", field)))
        };

        Ok(Self {
            query,
            crawl_depth: positive(crawl_depth, "crawl_depth")?,
            time_budget_secs: positive(time_budget_secs, "time_budget")?,
            url_limit: positive(url_limit, "url_limit")?,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn crawl_depth(&self) -> u32 {
        self.crawl_depth.get()
    }

    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs.get()
    }

    pub fn url_limit(&self) -> u32 {
        self.url_limit.get()
    }
}

/// A cited source returned by the research backend, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub url: String,
    /// The provider's full source object, passed through untouched.
    pub metadata: serde_json::Value,
}

/// Outcome of exactly one research tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchResult {
    Success {
        analysis: String,
        sources: Vec<SourceRecord>,
    },
    Failure {
        error_message: String,
    },
}

impl ResearchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ResearchResult::Success { .. })
    }

    /// Shape handed back to the model as the tool result.
    pub fn to_tool_value(&self) -> serde_json::Value {
        match self {
            ResearchResult::Success { analysis, sources } => serde_json::json!({
                "success": true,
                "analysis": analysis,
                "sources": sources.iter().map(|s| &s.metadata).collect::<Vec<_>>(),
            }),
            ResearchResult::Failure { error_message } => serde_json::json!({
                "success": false,
                "error": error_message,
            }),
        }
    }
}

/// Intermediate crawl progress reported by the research backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ActivityEvent {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            status: None,
            depth: None,
            timestamp: None,
        }
    }
}

// ============= Credibility Types =============

/// One structured assessment of a cited source, as emitted by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredibilityEntry {
    pub title: String,
    pub url: String,
    pub credibility_score: u8,
    pub strengths: String,
    pub weaknesses: String,
    pub justification: String,
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Research provider error: {0}")]
    Research(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
