use crate::research::{ActivityCallback, ResearchProvider};
use crate::types::{ActivityEvent, ResearchRequest, ResearchResult};
use std::sync::Arc;
use std::time::Instant;

/// Single normalization boundary between agents and the research backend.
///
/// Whatever the provider does, [`run`](Self::run) returns a
/// [`ResearchResult`]; provider errors are turned into
/// [`ResearchResult::Failure`] and never propagate.
#[derive(Clone)]
pub struct ResearchToolAdapter {
    provider: Arc<dyn ResearchProvider>,
}

impl ResearchToolAdapter {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }

    pub async fn run(
        &self,
        request: &ResearchRequest,
        on_activity: Option<&ActivityCallback>,
    ) -> ResearchResult {
        let start = Instant::now();
        let forward = |event: &ActivityEvent| {
            if let Some(callback) = on_activity {
                callback(event);
            }
        };

        tracing::info!(
            provider = self.provider.name(),
            query = request.query(),
            crawl_depth = request.crawl_depth(),
            time_budget_secs = request.time_budget_secs(),
            url_limit = request.url_limit(),
            "running deep research"
        );

        match self.provider.deep_research(request, &forward).await {
            Ok(research) => {
                tracing::info!(
                    sources = research.sources.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "deep research completed"
                );
                ResearchResult::Success {
                    analysis: research.final_analysis,
                    sources: research.sources,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "deep research failed");
                ResearchResult::Failure {
                    error_message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::ProviderResearch;
    use crate::types::{AppError, Result, SourceRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeProvider {
        outcome: std::result::Result<ProviderResearch, String>,
        events: Vec<ActivityEvent>,
    }

    #[async_trait]
    impl ResearchProvider for FakeProvider {
        async fn deep_research(
            &self,
            _request: &ResearchRequest,
            on_activity: &(dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync),
        ) -> Result<ProviderResearch> {
            for event in &self.events {
                on_activity(event);
            }
            self.outcome.clone().map_err(AppError::Research)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn request() -> ResearchRequest {
        ResearchRequest::new("llm interpretability", 3, 180, 10).unwrap()
    }

    #[tokio::test]
    async fn test_provider_error_becomes_failure() {
        let adapter = ResearchToolAdapter::new(Arc::new(FakeProvider {
            outcome: Err("timeout".to_string()),
            events: vec![],
        }));

        match adapter.run(&request(), None).await {
            ResearchResult::Failure { error_message } => assert!(error_message.contains("timeout")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_activity_forwarded_in_order_without_changing_result() {
        let research = ProviderResearch {
            final_analysis: "analysis".to_string(),
            sources: vec![
                SourceRecord {
                    url: "https://1.example".to_string(),
                    metadata: serde_json::json!({"url": "https://1.example"}),
                },
                SourceRecord {
                    url: "https://2.example".to_string(),
                    metadata: serde_json::json!({"url": "https://2.example"}),
                },
            ],
        };
        let provider = Arc::new(FakeProvider {
            outcome: Ok(research.clone()),
            events: vec![
                ActivityEvent::new("search", "first"),
                ActivityEvent::new("analyze", "second"),
            ],
        });
        let adapter = ResearchToolAdapter::new(provider);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ActivityCallback = Arc::new(move |event: &ActivityEvent| {
            sink.lock().unwrap().push(event.message.clone());
        });

        let with_callback = adapter.run(&request(), Some(&callback)).await;
        let without_callback = adapter.run(&request(), None).await;

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(with_callback, without_callback);
        assert_eq!(
            with_callback,
            ResearchResult::Success {
                analysis: research.final_analysis,
                sources: research.sources,
            }
        );
    }
}
