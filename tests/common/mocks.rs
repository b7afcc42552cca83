//! Mock implementations for testing.
//!
//! Scripted LLM clients and research providers shared by the integration
//! tests, so no test needs a live model or crawler.

#![allow(dead_code)]

use async_trait::async_trait;
use deepscribe::llm::coordinator::ConversationMessage;
use deepscribe::llm::{LLMClient, LLMResponse};
use deepscribe::research::{ProviderResearch, ResearchProvider};
use deepscribe::types::{
    ActivityEvent, AppError, ResearchRequest, Result, SourceRecord, ToolCall, ToolDefinition,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock LLM client that replays a fixed queue of turns.
///
/// Every call pops the next scripted turn and records the conversation it
/// was given, so tests can assert on exactly what each agent saw.
pub struct MockLLMClient {
    turns: Mutex<VecDeque<Result<LLMResponse>>>,
    seen: Mutex<Vec<Vec<ConversationMessage>>>,
    tools_offered: Mutex<Vec<Vec<String>>>,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
            tools_offered: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text answer.
    pub fn text(self, content: &str) -> Self {
        self.push(Ok(LLMResponse {
            content: content.to_string(),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
            usage: None,
        }))
    }

    /// Queue a turn that calls `name` with `arguments`.
    pub fn tool_call(self, id: &str, name: &str, arguments: serde_json::Value) -> Self {
        self.push(Ok(LLMResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            }],
            finish_reason: "tool_calls".to_string(),
            usage: None,
        }))
    }

    /// Queue a failing turn.
    pub fn failure(self, message: &str) -> Self {
        self.push(Err(AppError::LLM(message.to_string())))
    }

    fn push(self, turn: Result<LLMResponse>) -> Self {
        self.turns.lock().unwrap().push_back(turn);
        self
    }

    /// Conversations received so far, one per call.
    pub fn conversations(&self) -> Vec<Vec<ConversationMessage>> {
        self.seen.lock().unwrap().clone()
    }

    /// Tool names offered on each call.
    pub fn tools_offered(&self) -> Vec<Vec<String>> {
        self.tools_offered.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.turns.lock().unwrap().len()
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_tools_and_history(
        &self,
        messages: &[ConversationMessage],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.tools_offered
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());

        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLM("mock script exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Research provider returning a canned outcome and replaying activities.
pub struct MockResearchProvider {
    outcome: std::result::Result<ProviderResearch, String>,
    activities: Vec<ActivityEvent>,
    requests: Mutex<Vec<ResearchRequest>>,
}

impl MockResearchProvider {
    pub fn succeeding(analysis: &str, urls: &[&str]) -> Self {
        let sources = urls
            .iter()
            .map(|url| SourceRecord {
                url: url.to_string(),
                metadata: json!({"url": url, "title": format!("Source at {}", url)}),
            })
            .collect();
        Self {
            outcome: Ok(ProviderResearch {
                final_analysis: analysis.to_string(),
                sources,
            }),
            activities: vec![
                ActivityEvent::new("search", "searching the web"),
                ActivityEvent::new("analyze", "reading sources"),
            ],
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            activities: vec![],
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ResearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchProvider for MockResearchProvider {
    async fn deep_research(
        &self,
        request: &ResearchRequest,
        on_activity: &(dyn for<'e> Fn(&'e ActivityEvent) + Send + Sync),
    ) -> Result<ProviderResearch> {
        self.requests.lock().unwrap().push(request.clone());
        for event in &self.activities {
            on_activity(event);
        }
        self.outcome
            .clone()
            .map_err(AppError::Research)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

