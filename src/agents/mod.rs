//! Agent definitions and the execution engine contract
//!
//! An agent is a named bundle of instructions plus the tools it may call.
//! Definitions are plain immutable values built once at start-up; running one
//! is delegated to an [`AgentRunner`].

pub mod definitions;
pub mod runner;

use crate::tools::registry::ToolRegistry;
use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use definitions::AgentRoster;
pub use runner::LlmAgentRunner;

/// The four roles of the research pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Synthesizer,
    CredibilityEvaluator,
    Enhancer,
    FollowUpGenerator,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Synthesizer,
        AgentRole::CredibilityEvaluator,
        AgentRole::Enhancer,
        AgentRole::FollowUpGenerator,
    ];

    /// Unique agent identifier
    pub fn agent_name(&self) -> &'static str {
        match self {
            AgentRole::Synthesizer => "research_synthesis_agent",
            AgentRole::CredibilityEvaluator => "source_quality_agent",
            AgentRole::Enhancer => "research_expansion_agent",
            AgentRole::FollowUpGenerator => "followup_question_agent",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AgentRole::Synthesizer => "Synthesizer",
            AgentRole::CredibilityEvaluator => "Credibility Evaluator",
            AgentRole::Enhancer => "Enhancer",
            AgentRole::FollowUpGenerator => "Follow-up Generator",
        };
        f.write_str(label)
    }
}

/// A declarative agent: instructions plus the tools it may call
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    name: String,
    role: AgentRole,
    instructions: String,
    tools: Arc<ToolRegistry>,
}

impl AgentDefinition {
    pub fn new(role: AgentRole, instructions: impl Into<String>, tools: ToolRegistry) -> Self {
        Self {
            name: role.agent_name().to_string(),
            role,
            instructions: instructions.into(),
            tools: Arc::new(tools),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Output of one agent invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRunResult {
    pub final_output: String,
    /// LLM round-trips used
    pub iterations: usize,
    /// Tool calls made along the way
    pub tool_calls: usize,
}

impl AgentRunResult {
    pub fn new(final_output: impl Into<String>) -> Self {
        Self {
            final_output: final_output.into(),
            iterations: 1,
            tool_calls: 0,
        }
    }
}

/// Agent Execution Engine: runs an agent's reasoning loop to completion.
///
/// Yields exactly one [`AgentRunResult`] or one error per call. Tools the
/// agent calls along the way are invisible to the caller.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, agent: &AgentDefinition, input: &str) -> Result<AgentRunResult>;
}
