//! LLM-backed agent execution engine

use crate::agents::{AgentDefinition, AgentRunResult, AgentRunner};
use crate::llm::coordinator::{ToolCallingConfig, ToolCoordinator};
use crate::llm::LLMClient;
use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Runs agents on a shared [`LLMClient`], driving the tool-calling loop
/// through a [`ToolCoordinator`] bound to each agent's own tools.
pub struct LlmAgentRunner {
    client: Arc<dyn LLMClient>,
    config: ToolCallingConfig,
}

impl LlmAgentRunner {
    pub fn new(client: Arc<dyn LLMClient>, config: ToolCallingConfig) -> Self {
        Self { client, config }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

#[async_trait]
impl AgentRunner for LlmAgentRunner {
    async fn run(&self, agent: &AgentDefinition, input: &str) -> Result<AgentRunResult> {
        let start = Instant::now();
        let coordinator = ToolCoordinator::new(
            self.client.clone(),
            agent.tools().clone(),
            self.config.clone(),
        );

        let result = coordinator
            .execute(Some(agent.instructions()), input)
            .await?;

        tracing::debug!(
            agent = agent.name(),
            iterations = result.iterations,
            tool_calls = result.tool_calls.len(),
            prompt_tokens = result.total_usage.prompt_tokens,
            completion_tokens = result.total_usage.completion_tokens,
            duration_ms = start.elapsed().as_millis() as u64,
            "agent run finished"
        );

        Ok(AgentRunResult {
            final_output: result.content,
            iterations: result.iterations,
            tool_calls: result.tool_calls.len(),
        })
    }
}
