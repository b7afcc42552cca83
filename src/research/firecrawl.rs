//! Firecrawl deep-research client
//!
//! Starts an asynchronous deep-research job and polls its status until it
//! completes, forwarding each newly reported activity exactly once.

use crate::research::{ProviderResearch, ResearchProvider};
use crate::types::{ActivityEvent, AppError, ResearchRequest, Result, SourceRecord};
use crate::utils::config::{Credentials, ResearchConfig};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Extra time allowed on top of the job's own time budget before polling stops.
const POLL_GRACE: Duration = Duration::from_secs(120);

pub struct FirecrawlClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    poll_interval: Duration,
}

impl FirecrawlClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Build a client from `[research]` and the resolved credentials
    pub fn from_config(config: &ResearchConfig, credentials: &Credentials) -> Result<Self> {
        let api_key = credentials.research_provider_key.clone().ok_or_else(|| {
            AppError::Configuration(format!(
                "research provider requires an API key (set {})",
                config.api_key_env
            ))
        })?;

        Ok(Self::new(config.api_base.clone(), api_key)
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms)))
    }

    async fn start_job(&self, request: &ResearchRequest) -> Result<String> {
        let body = json!({
            "query": request.query(),
            "maxDepth": request.crawl_depth(),
            "timeLimit": request.time_budget_secs(),
            "maxUrls": request.url_limit(),
        });

        let response = self
            .http
            .post(format!("{}/v1/deep-research", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Research(format!("failed to start deep research: {}", e)))?;

        let started: StartResponse = Self::decode(response).await?;
        if !started.success {
            return Err(AppError::Research(
                started
                    .error
                    .unwrap_or_else(|| "deep research request was rejected".to_string()),
            ));
        }

        started
            .id
            .ok_or_else(|| AppError::Research("deep research response has no job id".to_string()))
    }

    async fn job_status(&self, id: &str) -> Result<StatusResponse> {
        let response = self
            .http
            .get(format!("{}/v1/deep-research/{}", self.api_base, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Research(format!("failed to poll deep research: {}", e)))?;

        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Research(format!(
                "Firecrawl returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Research(format!("malformed Firecrawl response: {}", e)))
    }
}

#[async_trait]
impl ResearchProvider for FirecrawlClient {
    async fn deep_research(
        &self,
        request: &ResearchRequest,
        on_activity: &(dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync),
    ) -> Result<ProviderResearch> {
        let job_id = self.start_job(request).await?;
        tracing::debug!(job_id = %job_id, query = request.query(), "deep research started");

        let deadline =
            Instant::now() + Duration::from_secs(u64::from(request.time_budget_secs())) + POLL_GRACE;
        let mut seen_activities = 0usize;

        loop {
            let status = self.job_status(&job_id).await?;

            let activities = status.activities();
            for raw in activities.iter().skip(seen_activities) {
                match serde_json::from_value::<ActivityEvent>(raw.clone()) {
                    Ok(event) => on_activity(&event),
                    Err(e) => tracing::debug!(error = %e, "skipping unreadable activity"),
                }
            }
            seen_activities = seen_activities.max(activities.len());

            let state = status.status.clone();
            match state.as_str() {
                "completed" => return status.into_research(),
                "failed" => {
                    return Err(AppError::Research(format!(
                        "deep research failed: {}",
                        status.error.unwrap_or_else(|| "unknown error".to_string())
                    )))
                }
                "processing" => {}
                other => {
                    return Err(AppError::Research(format!(
                        "deep research job terminated unexpectedly (status: {})",
                        other
                    )))
                }
            }

            if Instant::now() >= deadline {
                return Err(AppError::Research(format!(
                    "deep research job {} did not complete in time",
                    job_id
                )));
            }

            sleep(self.poll_interval).await;
        }
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}

// ============= Wire Types =============

#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    data: Option<StatusData>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    activities: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    #[serde(default)]
    final_analysis: Option<String>,
    #[serde(default)]
    sources: Vec<Value>,
    #[serde(default)]
    activities: Vec<Value>,
}

impl StatusResponse {
    /// Activities may be reported at the top level or inside `data`.
    fn activities(&self) -> &[Value] {
        match (&self.activities, &self.data) {
            (Some(top_level), _) => top_level,
            (None, Some(data)) => &data.activities,
            (None, None) => &[],
        }
    }

    fn into_research(self) -> Result<ProviderResearch> {
        let data = self.data.ok_or_else(|| {
            AppError::Research("completed deep research has no data".to_string())
        })?;
        let final_analysis = data.final_analysis.ok_or_else(|| {
            AppError::Research("completed deep research has no finalAnalysis".to_string())
        })?;

        let sources = data
            .sources
            .into_iter()
            .map(|metadata| SourceRecord {
                url: metadata
                    .get("url")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                metadata,
            })
            .collect();

        Ok(ProviderResearch {
            final_analysis,
            sources,
        })
    }
}
