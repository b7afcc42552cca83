//! The four agents of the research pipeline
//!
//! Only the Synthesizer carries a tool; the other three work purely on the
//! text they are handed.

use crate::agents::{AgentDefinition, AgentRole};
use crate::tools::deep_research::ResearchDefaults;
use crate::tools::registry::{Tool, ToolRegistry};
use std::sync::Arc;

/// The complete, immutable set of pipeline agents
#[derive(Debug, Clone)]
pub struct AgentRoster {
    pub synthesizer: AgentDefinition,
    pub evaluator: AgentDefinition,
    pub enhancer: AgentDefinition,
    pub followup: AgentDefinition,
}

impl AgentRoster {
    /// Build the roster, handing `research_tool` to the Synthesizer
    pub fn new(research_tool: Arc<dyn Tool>, defaults: ResearchDefaults) -> Self {
        Self {
            synthesizer: AgentDefinition::new(
                AgentRole::Synthesizer,
                synthesizer_instructions(research_tool.name(), defaults),
                ToolRegistry::new().with_tool(research_tool),
            ),
            evaluator: AgentDefinition::new(
                AgentRole::CredibilityEvaluator,
                EVALUATOR_INSTRUCTIONS,
                ToolRegistry::new(),
            ),
            enhancer: AgentDefinition::new(
                AgentRole::Enhancer,
                ENHANCER_INSTRUCTIONS,
                ToolRegistry::new(),
            ),
            followup: AgentDefinition::new(
                AgentRole::FollowUpGenerator,
                FOLLOWUP_INSTRUCTIONS,
                ToolRegistry::new(),
            ),
        }
    }

    pub fn get(&self, role: AgentRole) -> &AgentDefinition {
        match role {
            AgentRole::Synthesizer => &self.synthesizer,
            AgentRole::CredibilityEvaluator => &self.evaluator,
            AgentRole::Enhancer => &self.enhancer,
            AgentRole::FollowUpGenerator => &self.followup,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDefinition> {
        AgentRole::ALL.into_iter().map(move |role| self.get(role))
    }
}

fn synthesizer_instructions(tool_name: &str, defaults: ResearchDefaults) -> String {
    format!(
        r#"You are a professional research assistant.

1. Call the `{tool}` tool with:
   - crawl_depth = {depth}
   - time_budget = {budget} seconds
   - url_limit = {urls}
2. Synthesize the findings into a structured academic report.
3. Cite every source clearly, with its URL.
4. Highlight key insights and points of consensus.

If the research tool reports a failure, say so plainly and work with what you have."#,
        tool = tool_name,
        depth = defaults.crawl_depth,
        budget = defaults.time_budget_secs,
        urls = defaults.url_limit,
    )
}

const EVALUATOR_INSTRUCTIONS: &str = r#"You are an academic source evaluator.

From the research report:
- Identify every cited source
- Score each source on authority, recency, evidence quality and bias risk

Return STRICT JSON and nothing else, in exactly this format:
[
  {
    "title": "...",
    "url": "...",
    "credibility_score": 0-10,
    "strengths": "...",
    "weaknesses": "...",
    "justification": "..."
  }
]"#;

const ENHANCER_INSTRUCTIONS: &str = r#"You are a senior academic editor.

Enhance the research report by:
- Adding deeper explanations
- Including examples and case studies
- Covering trends and the future outlook
- Prioritizing high-credibility sources
- Flagging weak or biased evidence

Preserve academic rigor and structure."#;

const FOLLOWUP_INSTRUCTIONS: &str = r#"You are a senior research scientist.

Based on the final research report:
1. Identify gaps, open problems and weak evidence
2. Generate insightful follow-up research questions
3. Group them under these headings:
   - Open Research Problems
   - Methodological Questions
   - Practical / Policy Implications
   - Future Research Directions

Return STRICT markdown with section headers. Avoid generic questions."#;
