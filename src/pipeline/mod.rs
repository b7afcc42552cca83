//! Research pipeline
//!
//! Turns a topic into a finished markdown report by running four agents in a
//! fixed order:
//!
//! 1. **Researching**: the Synthesizer calls the deep-research tool and writes
//!    a cited draft
//! 2. **EvaluatingCredibility**: the evaluator scores every cited source
//! 3. **Enhancing**: the editor rewrites the draft using those scores
//! 4. **GeneratingFollowups**: open questions are drafted from the final text
//!
//! Each stage sees the earlier outputs verbatim. A failure in any stage
//! aborts the run with a [`PipelineError`] naming the stage.

pub mod assembler;
pub mod credibility;
pub mod orchestrator;
pub mod prompts;

use crate::agents::AgentRole;
use crate::types::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use assembler::assemble;
pub use credibility::{parse_credibility, CredibilityAssessment};
pub use orchestrator::ResearchPipeline;

/// One of the four agent-running stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineStage {
    Researching,
    EvaluatingCredibility,
    Enhancing,
    GeneratingFollowups,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Researching,
        PipelineStage::EvaluatingCredibility,
        PipelineStage::Enhancing,
        PipelineStage::GeneratingFollowups,
    ];

    /// The agent that runs this stage
    pub fn role(&self) -> AgentRole {
        match self {
            PipelineStage::Researching => AgentRole::Synthesizer,
            PipelineStage::EvaluatingCredibility => AgentRole::CredibilityEvaluator,
            PipelineStage::Enhancing => AgentRole::Enhancer,
            PipelineStage::GeneratingFollowups => AgentRole::FollowUpGenerator,
        }
    }

    /// 1-based position, for progress output
    pub fn number(&self) -> usize {
        match self {
            PipelineStage::Researching => 1,
            PipelineStage::EvaluatingCredibility => 2,
            PipelineStage::Enhancing => 3,
            PipelineStage::GeneratingFollowups => 4,
        }
    }

    fn failure_label(&self) -> &'static str {
        match self {
            PipelineStage::Researching => "research",
            PipelineStage::EvaluatingCredibility => "credibility evaluation",
            PipelineStage::Enhancing => "enhancement",
            PipelineStage::GeneratingFollowups => "follow-up generation",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Researching => "Researching",
            PipelineStage::EvaluatingCredibility => "EvaluatingCredibility",
            PipelineStage::Enhancing => "Enhancing",
            PipelineStage::GeneratingFollowups => "GeneratingFollowups",
        };
        f.write_str(name)
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStatus {
    Init,
    Running(PipelineStage),
    Done,
    Failed(PipelineStage),
}

impl PipelineStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStatus::Done | PipelineStatus::Failed(_))
    }
}

/// A stage failed; the run produced no document
#[derive(Debug, thiserror::Error)]
#[error("{} failed: {}", .stage.failure_label(), .cause)]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub cause: AppError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, cause: AppError) -> Self {
        Self { stage, cause }
    }
}

/// Record of one completed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: PipelineStage,
    pub agent_name: String,
    /// Message the agent received
    pub input: String,
    pub output: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub iterations: usize,
    pub tool_calls: usize,
}

/// Everything a successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub run_id: uuid::Uuid,
    pub topic: String,
    pub draft_report: String,
    pub credibility: CredibilityAssessment,
    pub enhanced_report: String,
    pub followup_text: String,
    pub final_document: String,
    pub stages: Vec<StageRecord>,
    pub generated_at: DateTime<Utc>,
}

/// Progress hooks for a running pipeline. All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    fn stage_started(&self, _stage: PipelineStage) {}

    fn stage_completed(&self, _record: &StageRecord) {}

    fn credibility_evaluated(&self, _assessment: &CredibilityAssessment) {}

    fn stage_failed(&self, _stage: PipelineStage, _error: &AppError) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
