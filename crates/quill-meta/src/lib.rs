//! Shared artifact-format types for the Quill documentation pipeline.
//!
//! The build phase writes three kinds of output, all addressed relative to a
//! single output directory:
//!
//! ```text
//! {out}/
//! ├── content/
//! │   └── {version}/docs/
//! │       ├── {slug}.html   # Render artifact
//! │       └── {slug}.json   # Metadata sidecar
//! ├── manifest.json         # version -> [ManifestEntry]
//! └── search/
//!     └── {version}.json    # [SearchDocument]
//! ```
//!
//! This crate defines the types serialized into those files plus the path
//! mapping, so the build and serve phases agree on the layout without
//! depending on each other.

mod doc_id;
mod manifest;
mod paths;

pub use doc_id::DocId;
pub use manifest::{Manifest, ManifestEntry, SearchDocument};
pub use paths::{artifact_path, corpus_path, manifest_path, sidecar_path};
