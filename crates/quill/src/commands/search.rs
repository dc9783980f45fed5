//! `quill search` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_search::{DEFAULT_LIMIT, SearchEngine};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Version to search within (e.g., "v1").
    version: String,

    /// Query text; every word must prefix-match a document.
    query: String,

    /// Output directory produced by `quill build`.
    #[arg(short, long, default_value = ".quill")]
    out: PathBuf,

    /// Maximum number of results.
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
}

impl SearchArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let engine = SearchEngine::new(self.out);
        let hits = engine.query(&self.version, &self.query, self.limit);

        if hits.is_empty() {
            output.warning("No results");
            return Ok(());
        }
        for hit in &hits {
            output.search_hit(hit);
        }
        Ok(())
    }
}
