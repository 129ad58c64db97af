//! Output file writers.

use crate::model::LoadSummary;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Output paths for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub chart: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    /// `<stem>_results.png` and `<stem>_summary.txt` in `dir`.
    pub fn new(dir: &Path, test_name: &str) -> Self {
        Self {
            chart: dir.join(format!("{test_name}_results.png")),
            summary: dir.join(format!("{test_name}_summary.txt")),
        }
    }
}

/// Input file name without its extension.
pub fn test_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory containing `input`; the current directory for bare file names.
pub fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn write_summary_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

/// Write the summary as pretty JSON.
pub fn export_json(path: &Path, summary: &LoadSummary) -> Result<()> {
    let data = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
