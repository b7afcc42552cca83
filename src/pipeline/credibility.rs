//! Best-effort parsing of the evaluator's credibility table
//!
//! The evaluator is asked for a strict JSON array, but its output is model
//! generated. Parsing therefore has two first-class outcomes: a structured
//! table, or the raw text alone. Both keep the raw text untouched.

use crate::types::CredibilityEntry;
use serde::Serialize;

pub const MAX_CREDIBILITY_SCORE: u8 = 10;

/// Why evaluator output could not be read as a credibility table
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredibilityParseError {
    #[error("not a well-formed credibility list: {0}")]
    Malformed(String),

    #[error("entry {index} has credibility_score {score}, expected 0-{MAX_CREDIBILITY_SCORE}")]
    ScoreOutOfRange { index: usize, score: u8 },
}

/// Strictly parse `raw` as an ordered list of credibility entries.
///
/// Any missing or unknown field, a non-integer score, a score above 10 or a
/// top-level value that is not an array rejects the whole output.
pub fn parse_credibility(raw: &str) -> Result<Vec<CredibilityEntry>, CredibilityParseError> {
    let entries: Vec<CredibilityEntry> = serde_json::from_str(raw)
        .map_err(|e| CredibilityParseError::Malformed(e.to_string()))?;

    if let Some((index, entry)) = entries
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.credibility_score > MAX_CREDIBILITY_SCORE)
    {
        return Err(CredibilityParseError::ScoreOutOfRange {
            index,
            score: entry.credibility_score,
        });
    }

    Ok(entries)
}

/// Evaluator output: always the raw text, plus the table when it parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredibilityAssessment {
    raw: String,
    /// `None` when the raw text did not parse; `Some(vec![])` is a valid empty table.
    entries: Option<Vec<CredibilityEntry>>,
}

impl CredibilityAssessment {
    /// Parse `raw`, keeping only the raw text when it is not valid
    pub fn from_raw(raw: String) -> Self {
        let entries = match parse_credibility(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(error = %e, "credibility output is not structured, keeping raw text");
                None
            }
        };
        Self { raw, entries }
    }

    /// The evaluator's unmodified output
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed entries in the evaluator's order; empty on fallback
    pub fn entries(&self) -> &[CredibilityEntry] {
        self.entries.as_deref().unwrap_or_default()
    }

    /// Whether the raw text parsed as a table, even an empty one
    pub fn is_structured(&self) -> bool {
        self.entries.is_some()
    }
}
