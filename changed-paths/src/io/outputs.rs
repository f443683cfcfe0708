//! Result emission.
//!
//! Results go to the runner's output file (`GITHUB_OUTPUT`) as `key=value`
//! lines, or to stdout when no output file is configured. The changed-file
//! count is a human-facing notice on stderr.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::evaluator::ResultMapping;

/// Render results as `label=true|false` lines.
pub fn format_results(results: &ResultMapping) -> String {
    results
        .iter()
        .map(|(label, matched)| format!("{label}={matched}\n"))
        .collect()
}

/// Append results to `output_file`, or print them when `None`.
pub fn write_results(output_file: Option<&Path>, results: &ResultMapping) -> Result<()> {
    let rendered = format_results(results);
    match output_file {
        Some(path) => {
            debug!(path = %path.display(), outputs = results.len(), "appending outputs");
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open output file {}", path.display()))?;
            file.write_all(rendered.as_bytes())
                .with_context(|| format!("write output file {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("write outputs to stdout")
        }
    }
}

pub fn format_summary(changed_files: usize, strategy: &str) -> String {
    format!("Found {changed_files} changed file(s) via {strategy}\n")
}

/// Print the changed-file count to stderr so stdout only carries results.
pub fn write_summary(changed_files: usize, strategy: &str) -> Result<()> {
    let mut stderr = std::io::stderr().lock();
    stderr
        .write_all(format_summary(changed_files, strategy).as_bytes())
        .context("write summary to stderr")
}
