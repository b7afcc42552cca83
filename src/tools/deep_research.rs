//! Deep research tool
//!
//! Exposes the [`ResearchToolAdapter`] to agents as `perform_deep_research`.
//! The tool result is always a JSON object: research failures are reported
//! with `"success": false` so the agent can narrate around them.

use crate::research::{ActivityCallback, ResearchToolAdapter};
use crate::tools::registry::Tool;
use crate::types::{AppError, ResearchRequest, Result};
use crate::utils::config::ResearchConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

pub const DEEP_RESEARCH_TOOL: &str = "perform_deep_research";

/// Limits applied when the model omits an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchDefaults {
    pub crawl_depth: u32,
    pub time_budget_secs: u32,
    pub url_limit: u32,
}

impl Default for ResearchDefaults {
    fn default() -> Self {
        Self {
            crawl_depth: 3,
            time_budget_secs: 180,
            url_limit: 10,
        }
    }
}

impl From<&ResearchConfig> for ResearchDefaults {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            crawl_depth: config.crawl_depth,
            time_budget_secs: config.time_budget_secs,
            url_limit: config.url_limit,
        }
    }
}

pub struct DeepResearchTool {
    adapter: ResearchToolAdapter,
    defaults: ResearchDefaults,
    on_activity: Option<ActivityCallback>,
}

impl DeepResearchTool {
    pub fn new(adapter: ResearchToolAdapter, defaults: ResearchDefaults) -> Self {
        Self {
            adapter,
            defaults,
            on_activity: None,
        }
    }

    /// Forward crawl activity to `callback` while the tool runs.
    pub fn with_activity_callback(mut self, callback: ActivityCallback) -> Self {
        self.on_activity = Some(callback);
        self
    }

    fn parse_request(&self, args: &Value) -> Result<ResearchRequest> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidInput("Missing 'query' parameter".to_string()))?;

        let limit = |field: &str, default: u32| -> Result<u32> {
            match args.get(field) {
                None | Some(Value::Null) => Ok(default),
                Some(value) => value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!("'{}' must be a positive integer", field))
                    }),
            }
        };

        ResearchRequest::new(
            query,
            limit("crawl_depth", self.defaults.crawl_depth)?,
            limit("time_budget", self.defaults.time_budget_secs)?,
            limit("url_limit", self.defaults.url_limit)?,
        )
    }
}

#[async_trait]
impl Tool for DeepResearchTool {
    fn name(&self) -> &str {
        DEEP_RESEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Run a deep web research job: crawl and analyze the web for a query and return a written analysis with its sources"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The research question"
                },
                "crawl_depth": {
                    "type": "integer",
                    "description": "How many link levels to follow",
                    "minimum": 1,
                    "default": self.defaults.crawl_depth
                },
                "time_budget": {
                    "type": "integer",
                    "description": "Time limit for the job in seconds",
                    "minimum": 1,
                    "default": self.defaults.time_budget_secs
                },
                "url_limit": {
                    "type": "integer",
                    "description": "Maximum number of URLs to analyze",
                    "minimum": 1,
                    "default": self.defaults.url_limit
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let request = self.parse_request(&args)?;
        let result = self.adapter.run(&request, self.on_activity.as_ref()).await;
        Ok(result.to_tool_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::{ProviderResearch, ResearchProvider};
    use crate::types::{ActivityEvent, SourceRecord};
    use std::sync::{Arc, Mutex};

    /// Records the last request and answers with a fixed outcome.
    struct RecordingProvider {
        last: Mutex<Option<ResearchRequest>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl ResearchProvider for RecordingProvider {
        async fn deep_research(
            &self,
            request: &ResearchRequest,
            on_activity: &(dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync),
        ) -> Result<ProviderResearch> {
            *self.last.lock().unwrap() = Some(request.clone());
            on_activity(&ActivityEvent::new("search", "looking"));
            match &self.fail_with {
                Some(message) => Err(AppError::Research(message.clone())),
                None => Ok(ProviderResearch {
                    final_analysis: "analysis".to_string(),
                    sources: vec![SourceRecord {
                        url: "https://x.example".to_string(),
                        metadata: json!({"url": "https://x.example"}),
                    }],
                }),
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn tool(fail_with: Option<&str>) -> (DeepResearchTool, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider {
            last: Mutex::new(None),
            fail_with: fail_with.map(str::to_string),
        });
        let tool = DeepResearchTool::new(
            ResearchToolAdapter::new(provider.clone()),
            ResearchDefaults::default(),
        );
        (tool, provider)
    }

    #[test]
    fn test_tool_definition() {
        let (tool, _) = tool(None);
        assert_eq!(tool.name(), "perform_deep_research");
        let schema = tool.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["crawl_depth"].is_object());
        assert!(schema["required"]
            .as_array()
            .unwrap()
            .contains(&json!("query")));
    }

    #[tokio::test]
    async fn test_explicit_arguments_are_used() {
        let (tool, provider) = tool(None);
        let value = tool
            .execute(json!({"query": "rust", "crawl_depth": 2, "time_budget": 60, "url_limit": 5}))
            .await
            .unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["sources"][0]["url"], "https://x.example");
        let request = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(request, ResearchRequest::new("rust", 2, 60, 5).unwrap());
    }

    #[tokio::test]
    async fn test_missing_limits_fall_back_to_defaults() {
        let (tool, provider) = tool(None);
        tool.execute(json!({"query": "rust"})).await.unwrap();
        let request = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.crawl_depth(), 3);
        assert_eq!(request.time_budget_secs(), 180);
        assert_eq!(request.url_limit(), 10);
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected() {
        let (tool, provider) = tool(None);
        assert!(tool.execute(json!({})).await.is_err());
        assert!(tool
            .execute(json!({"query": "rust", "crawl_depth": 0}))
            .await
            .is_err());
        assert!(tool
            .execute(json!({"query": "rust", "url_limit": -1}))
            .await
            .is_err());
        assert!(provider.last.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_a_tool_value() {
        let (tool, _) = tool(Some("timeout"));
        let value = tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn test_activity_callback_is_wired() {
        let (tool, _) = tool(None);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let tool = tool.with_activity_callback(Arc::new(move |event: &ActivityEvent| {
            sink.lock().unwrap().push(format!("[{}] {}", event.kind, event.message));
        }));

        tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["[search] looking"]);
    }
}
