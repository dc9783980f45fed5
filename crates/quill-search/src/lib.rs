//! Prefix search over per-version corpora produced by the build pipeline.
//!
//! [`SearchEngine`] loads each version's corpus lazily on its first query
//! and keeps the inverted index in memory for the process lifetime. Every
//! query token must prefix-match a document for it to appear in the results,
//! which are ranked by how many indexed tokens matched.
//!
//! Missing or unreadable corpora make a version permanently unavailable:
//! its queries return no results rather than errors.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use quill_search::{DEFAULT_LIMIT, SearchEngine};
//!
//! let engine = SearchEngine::new(PathBuf::from(".quill"));
//! for hit in engine.query("v1", "quickstart", DEFAULT_LIMIT) {
//!     println!("{} ({})", hit.title, hit.slug);
//! }
//! ```

mod engine;
mod index;

pub use engine::{DEFAULT_LIMIT, SearchEngine, SearchHit};
