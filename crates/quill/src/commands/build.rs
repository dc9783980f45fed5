//! `quill build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_build::{BuildOptions, BuildPipeline, ErrorPolicy};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Content root containing `<version>/docs/` trees.
    #[arg(short, long, default_value = "content")]
    content: PathBuf,

    /// Output directory for artifacts, manifest and search corpora.
    #[arg(short, long, default_value = ".quill")]
    out: PathBuf,

    /// Abort on the first document that fails instead of skipping it.
    #[arg(long)]
    fail_fast: bool,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        output.info(&format!("Source: {}", self.content.display()));
        output.info(&format!("Output: {}", self.out.display()));

        let mut options = BuildOptions::new(self.content, self.out.clone());
        if self.fail_fast {
            options.policy = ErrorPolicy::Fatal;
        }

        let summary = BuildPipeline::new(options).run()?;
        output.build_summary(&summary, &self.out);
        Ok(())
    }
}
