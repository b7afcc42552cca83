//! Saving finished reports

use crate::types::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `<topic with spaces as underscores>_research.md`
///
/// Path separators are replaced too so the file always lands in the
/// working directory.
pub fn report_file_name(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}_research.md", stem)
}

/// Write `document` to `output`, or to the default name in `dir`
pub fn save_report(
    document: &str,
    topic: &str,
    output: Option<&Path>,
    dir: &Path,
) -> Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => dir.join(report_file_name(topic)),
    };

    fs::write(&path, document).map_err(|e| {
        AppError::Internal(format!("failed to write {}: {}", path.display(), e))
    })?;
    tracing::info!(path = %path.display(), bytes = document.len(), "report saved");
    Ok(path)
}
