/// Marker between the enhanced report and the follow-up section.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Heading placed before the follow-up questions.
pub const FOLLOWUP_HEADER: &str = "## ❓ Follow-Up Research Questions\n\n";

/// Concatenate the enhanced report and the follow-up questions.
pub fn assemble(enhanced_report: &str, followup_text: &str) -> String {
    let mut document = String::with_capacity(
        enhanced_report.len() + SECTION_SEPARATOR.len() + FOLLOWUP_HEADER.len() + followup_text.len(),
    );
    document.push_str(enhanced_report);
    document.push_str(SECTION_SEPARATOR);
    document.push_str(FOLLOWUP_HEADER);
    document.push_str(followup_text);
    document
}
