//! Build orchestrator for the Quill documentation pipeline.
//!
//! Runs once per deploy, before the server starts. Discovers every markdown
//! document under `<content>/<version>/docs/`, drives frontmatter extraction
//! and compilation, and writes the complete build output: one artifact pair
//! per document, one manifest, and one search corpus per version.
//!
//! The run is strictly sequential in discovery order, so unchanged input
//! reproduces byte-identical manifest and corpus files. Document-scoped
//! failures are logged and skipped by default; see [`ErrorPolicy`].
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), quill_build::BuildError> {
//! use std::path::PathBuf;
//! use quill_build::{BuildOptions, BuildPipeline};
//!
//! let options = BuildOptions::new(PathBuf::from("content"), PathBuf::from(".quill"));
//! let summary = BuildPipeline::new(options).run()?;
//! println!("compiled {} document(s)", summary.produced);
//! # Ok(())
//! # }
//! ```

mod discover;
mod pipeline;

pub use pipeline::{BuildError, BuildOptions, BuildPipeline, BuildSummary, DocumentError, ErrorPolicy};
