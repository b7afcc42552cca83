//! Stage input messages
//!
//! Each builder embeds the earlier stage outputs verbatim; nothing is trimmed
//! or summarized on the way through.

/// Stage 1: the topic alone.
pub fn research_prompt(topic: &str) -> String {
    topic.to_string()
}

/// Stage 2: topic and draft report.
pub fn credibility_prompt(topic: &str, draft_report: &str) -> String {
    format!(
        "RESEARCH TOPIC:\n{topic}\n\nRESEARCH REPORT:\n{draft_report}\n\nEvaluate all cited sources.\n"
    )
}

/// Stage 3: topic, draft report and the evaluator's raw output.
pub fn enhancement_prompt(topic: &str, draft_report: &str, credibility_raw: &str) -> String {
    format!(
        "RESEARCH TOPIC:\n{topic}\n\nINITIAL REPORT:\n{draft_report}\n\nSOURCE EVALUATION:\n{credibility_raw}\n\nProduce an enhanced academic research report.\n"
    )
}

/// Stage 4: topic and enhanced report.
pub fn followup_prompt(topic: &str, enhanced_report: &str) -> String {
    format!(
        "RESEARCH TOPIC:\n{topic}\n\nFINAL REPORT:\n{enhanced_report}\n\nGenerate follow-up research questions.\n"
    )
}
