//! Terminal progress for a running pipeline

use super::output::Output;
use crate::pipeline::{CredibilityAssessment, PipelineObserver, PipelineStage, StageRecord};
use crate::types::AppError;

/// Prints one line per stage transition
#[derive(Debug, Clone, Copy)]
pub struct TerminalProgress {
    output: Output,
}

impl TerminalProgress {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

fn describe(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Researching => "Running deep research and drafting the report...",
        PipelineStage::EvaluatingCredibility => "Evaluating source credibility...",
        PipelineStage::Enhancing => "Enhancing the report...",
        PipelineStage::GeneratingFollowups => "Generating follow-up questions...",
    }
}

impl PipelineObserver for TerminalProgress {
    fn stage_started(&self, stage: PipelineStage) {
        self.output
            .step(stage.number(), PipelineStage::ALL.len(), describe(stage));
    }

    fn stage_completed(&self, record: &StageRecord) {
        let secs = record.duration_ms as f64 / 1000.0;
        let mut message = format!("{} finished in {:.1}s", record.stage.role(), secs);
        if record.tool_calls > 0 {
            message.push_str(&format!(" ({} tool calls)", record.tool_calls));
        }
        self.output.success(&message);
    }

    fn credibility_evaluated(&self, assessment: &CredibilityAssessment) {
        if !assessment.is_structured() {
            self.output
                .warning("Credibility output was not a valid table; using the raw text");
        }
    }

    fn stage_failed(&self, stage: PipelineStage, error: &AppError) {
        self.output
            .error(&format!("{} stage failed: {}", stage.role(), error));
    }
}
