//! Stage sequencing for the research pipeline

use crate::agents::{AgentRoster, AgentRunner, LlmAgentRunner};
use crate::llm::coordinator::ToolCallingConfig;
use crate::llm::{LLMClient, LLMClientFactory};
use crate::pipeline::{
    assembler, prompts, CredibilityAssessment, NoopObserver, PipelineError, PipelineObserver,
    PipelineStage, PipelineStatus, ResearchReport, StageRecord,
};
use crate::research::{ActivityCallback, FirecrawlClient, ResearchToolAdapter};
use crate::tools::deep_research::{DeepResearchTool, ResearchDefaults};
use crate::types::Result;
use crate::utils::config::{Credentials, DeepscribeConfig};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Per-run bookkeeping. Each run owns its own state, so concurrent runs on
/// one [`ResearchPipeline`] never share anything mutable.
#[derive(Debug)]
pub struct PipelineState {
    status: PipelineStatus,
    stages: Vec<StageRecord>,
}

impl PipelineState {
    fn new() -> Self {
        Self {
            status: PipelineStatus::Init,
            stages: Vec::with_capacity(PipelineStage::ALL.len()),
        }
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn stages(&self) -> &[StageRecord] {
        &self.stages
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug_assert!(!self.status.is_terminal(), "stage entered after run ended");
        self.status = PipelineStatus::Running(stage);
    }

    fn complete(&mut self, record: StageRecord) {
        self.stages.push(record);
    }

    fn fail(&mut self, stage: PipelineStage) {
        self.status = PipelineStatus::Failed(stage);
    }

    fn finish(&mut self) -> Vec<StageRecord> {
        self.status = PipelineStatus::Done;
        std::mem::take(&mut self.stages)
    }
}

/// Runs the four pipeline agents in order and assembles the final document.
///
/// The pipeline holds no per-run data; one instance can serve any number of
/// topics, sequentially or concurrently.
#[derive(Clone)]
pub struct ResearchPipeline {
    runner: Arc<dyn AgentRunner>,
    agents: Arc<AgentRoster>,
    observer: Arc<dyn PipelineObserver>,
}

impl ResearchPipeline {
    pub fn new(runner: Arc<dyn AgentRunner>, agents: AgentRoster) -> Self {
        Self {
            runner,
            agents: Arc::new(agents),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Wire the whole stack from configuration: LLM client, research
    /// backend, deep-research tool, agent roster and execution engine.
    pub fn from_config(
        config: &DeepscribeConfig,
        credentials: &Credentials,
        on_activity: Option<ActivityCallback>,
    ) -> Result<Self> {
        config.validate()?;

        let factory = LLMClientFactory::from_config(&config.llm, credentials)?;
        let client: Arc<dyn LLMClient> = Arc::from(factory.create_default());

        let provider = FirecrawlClient::from_config(&config.research, credentials)?;
        let defaults = ResearchDefaults::from(&config.research);
        let mut tool = DeepResearchTool::new(ResearchToolAdapter::new(Arc::new(provider)), defaults);
        if let Some(callback) = on_activity {
            tool = tool.with_activity_callback(callback);
        }

        let roster = AgentRoster::new(Arc::new(tool), defaults);
        let runner = LlmAgentRunner::new(client, ToolCallingConfig::from(&config.engine));

        tracing::debug!(
            provider = factory.default_provider().name(),
            model = runner.model_name(),
            "research pipeline configured"
        );

        Ok(Self::new(Arc::new(runner), roster))
    }

    pub fn agents(&self) -> &AgentRoster {
        &self.agents
    }

    /// Run every stage for `topic` and return the final markdown document.
    pub async fn execute_research_pipeline(
        &self,
        topic: &str,
    ) -> std::result::Result<String, PipelineError> {
        self.execute(topic).await.map(|report| report.final_document)
    }

    /// Run every stage for `topic`, keeping all intermediate outputs.
    pub async fn execute(&self, topic: &str) -> std::result::Result<ResearchReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("research_pipeline", %run_id);
        self.run(run_id, topic).instrument(span).await
    }

    async fn run(
        &self,
        run_id: Uuid,
        topic: &str,
    ) -> std::result::Result<ResearchReport, PipelineError> {
        let started = Instant::now();
        let mut state = PipelineState::new();
        tracing::info!(topic, "research pipeline started");

        let draft_report = self
            .run_stage(&mut state, PipelineStage::Researching, prompts::research_prompt(topic))
            .await?;

        let credibility_raw = self
            .run_stage(
                &mut state,
                PipelineStage::EvaluatingCredibility,
                prompts::credibility_prompt(topic, &draft_report),
            )
            .await?;
        let credibility = CredibilityAssessment::from_raw(credibility_raw);
        tracing::info!(
            structured = credibility.is_structured(),
            sources = credibility.entries().len(),
            "credibility evaluated"
        );
        self.observer.credibility_evaluated(&credibility);

        let enhanced_report = self
            .run_stage(
                &mut state,
                PipelineStage::Enhancing,
                prompts::enhancement_prompt(topic, &draft_report, credibility.raw()),
            )
            .await?;

        let followup_text = self
            .run_stage(
                &mut state,
                PipelineStage::GeneratingFollowups,
                prompts::followup_prompt(topic, &enhanced_report),
            )
            .await?;

        let final_document = assembler::assemble(&enhanced_report, &followup_text);
        let stages = state.finish();

        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            document_len = final_document.len(),
            "research pipeline finished"
        );

        Ok(ResearchReport {
            run_id,
            topic: topic.to_string(),
            draft_report,
            credibility,
            enhanced_report,
            followup_text,
            final_document,
            stages,
            generated_at: Utc::now(),
        })
    }

    async fn run_stage(
        &self,
        state: &mut PipelineState,
        stage: PipelineStage,
        input: String,
    ) -> std::result::Result<String, PipelineError> {
        state.enter(stage);
        self.observer.stage_started(stage);

        let agent = self.agents.get(stage.role());
        let started_at = Utc::now();
        let start = Instant::now();
        tracing::info!(%stage, agent = agent.name(), "stage started");

        match self.runner.run(agent, &input).await {
            Ok(result) => {
                let record = StageRecord {
                    stage,
                    agent_name: agent.name().to_string(),
                    input,
                    output: result.final_output.clone(),
                    started_at,
                    duration_ms: start.elapsed().as_millis() as u64,
                    iterations: result.iterations,
                    tool_calls: result.tool_calls,
                };
                tracing::info!(
                    %stage,
                    duration_ms = record.duration_ms,
                    output_len = record.output.len(),
                    "stage completed"
                );
                self.observer.stage_completed(&record);
                state.complete(record);
                Ok(result.final_output)
            }
            Err(cause) => {
                tracing::error!(%stage, error = %cause, "stage failed");
                state.fail(stage);
                self.observer.stage_failed(stage, &cause);
                Err(PipelineError::new(stage, cause))
            }
        }
    }
}
