//! Colored terminal output for build and search runs.

use std::path::Path;

use console::{Style, Term};
use quill_build::BuildSummary;
use quill_search::SearchHit;

/// Writes human-facing command output to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print the outcome of a build run: skip and degradation warnings first,
    /// then the produced count in green.
    pub(crate) fn build_summary(&self, summary: &BuildSummary, out_dir: &Path) {
        if summary.skipped > 0 {
            self.warning(&format!("Skipped {} document(s)", summary.skipped));
        }
        if summary.highlight_degraded {
            self.warning(
                "Syntax highlighting was disabled mid-build; affected pages use plain code blocks",
            );
        }
        let _ = self.term.write_line(
            &self
                .green
                .apply_to(format!(
                    "Built {} document(s) to {}",
                    summary.produced,
                    out_dir.display()
                ))
                .to_string(),
        );
    }

    /// Print one search hit: title, then slug and description dimmed.
    pub(crate) fn search_hit(&self, hit: &SearchHit) {
        let _ = self.term.write_line(&format!(
            "{}  {}",
            hit.title,
            self.dim.apply_to(format!("({})", hit.slug))
        ));
        if !hit.description.is_empty() {
            let _ = self
                .term
                .write_line(&format!("    {}", self.dim.apply_to(&hit.description)));
        }
    }
}
