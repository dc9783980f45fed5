//! Serve-time content loading and navigation.
//!
//! This crate provides:
//! - [`ContentStore`]: lazy, process-lifetime access to build output (the
//!   manifest and per-document artifact pairs)
//! - [`Navigation`]: per-request sidebar tree assembly from ordering metadata
//!
//! # Thread Safety
//!
//! `ContentStore` is designed for concurrent access from request handlers:
//! cache entries are fully built before they are published, so racing
//! first-accesses may duplicate work but never observe a partial value.
//! `Navigation` holds no mutable state and reads ordering metadata fresh on
//! every call.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use quill_site::{ContentStore, Navigation};
//!
//! let store = Arc::new(ContentStore::new(PathBuf::from(".quill")));
//! let nav = Navigation::new(PathBuf::from("content"), Arc::clone(&store));
//!
//! // Load a page (None means not found)
//! let page = store.page("v1", &[]);
//!
//! // Build the sidebar for a version
//! let tree = nav.tree("v1");
//! # Ok(())
//! # }
//! ```

mod loader;
mod navigation;

pub use loader::{ContentError, ContentStore, LoadedPage};
pub use navigation::{NavNode, Navigation, OrderingFile};
