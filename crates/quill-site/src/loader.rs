//! Lazy loading of build output with process-lifetime caches.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use quill_meta::{DocId, Manifest, ManifestEntry};
use quill_renderer::PageData;

/// A loaded artifact pair.
#[derive(Clone, Debug)]
pub struct LoadedPage {
    /// Render artifact (self-contained HTML).
    pub html: String,
    /// Metadata sidecar (frontmatter, headings, plain text).
    pub data: PageData,
}

/// Error loading the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest file is not valid JSON.
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serve-time access to the build output directory.
///
/// Owns two lazy caches that live for the process lifetime: the manifest
/// (loaded at most once) and the page cache (populated per `(version, slug)`
/// on first successful load). Values are fully built before being published
/// into a cache, so concurrent readers never see a partial entry; racing
/// first-accesses may duplicate the load, and the first published value wins.
///
/// Constructed once at process bootstrap and shared via `Arc` — there are no
/// global singletons.
pub struct ContentStore {
    out_dir: PathBuf,
    manifest: RwLock<Option<Arc<Manifest>>>,
    pages: RwLock<HashMap<(String, String), Arc<LoadedPage>>>,
}

impl ContentStore {
    /// Create a store over a build output directory.
    #[must_use]
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            manifest: RwLock::new(None),
            pages: RwLock::new(HashMap::new()),
        }
    }

    /// The full manifest, cached after the first successful load.
    ///
    /// Failures are returned to the caller and not cached, so a manifest
    /// written after startup becomes visible on the next call.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn manifest(&self) -> Result<Arc<Manifest>, ContentError> {
        if let Some(manifest) = self.manifest.read().unwrap().as_ref() {
            return Ok(Arc::clone(manifest));
        }

        let path = quill_meta::manifest_path(&self.out_dir);
        let manifest: Manifest = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let manifest = Arc::new(manifest);
        tracing::info!(path = %path.display(), entries = manifest.len(), "Manifest loaded");

        let mut guard = self.manifest.write().unwrap();
        if let Some(existing) = guard.as_ref() {
            // Another loader won the race; keep its value.
            return Ok(Arc::clone(existing));
        }
        *guard = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    /// Load a page by version and slug segments.
    ///
    /// An empty segment list means the version's index page. Returns `None`
    /// when either half of the artifact pair is missing or unreadable — the
    /// routing layer maps that to its not-found response. Successful loads
    /// are cached for the process lifetime.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, version: &str, slug: &[String]) -> Option<Arc<LoadedPage>> {
        let segments: Vec<String> = if slug.is_empty() {
            vec!["index".to_owned()]
        } else {
            slug.to_vec()
        };
        let key = (version.to_owned(), segments.join("/"));

        if let Some(page) = self.pages.read().unwrap().get(&key) {
            return Some(Arc::clone(page));
        }

        let page = Arc::new(self.load_pair(&DocId::new(version, segments))?);
        let mut guard = self.pages.write().unwrap();
        let entry = guard.entry(key).or_insert(page);
        Some(Arc::clone(entry))
    }

    /// Manifest entries for a version.
    ///
    /// Unknown versions yield an empty list, as does a manifest that cannot
    /// be loaded (logged, never surfaced).
    #[must_use]
    pub fn pages(&self, version: &str) -> Vec<ManifestEntry> {
        match self.manifest() {
            Ok(manifest) => manifest.entries(version).to_vec(),
            Err(err) => {
                tracing::warn!(error = %err, "Manifest unavailable, returning no pages");
                Vec::new()
            }
        }
    }

    /// Read both halves of an artifact pair, `None` on any failure.
    fn load_pair(&self, id: &DocId) -> Option<LoadedPage> {
        let artifact = quill_meta::artifact_path(&self.out_dir, id);
        let sidecar = quill_meta::sidecar_path(&self.out_dir, id);

        let html = fs::read_to_string(&artifact)
            .inspect_err(|err| {
                tracing::debug!(path = %artifact.display(), error = %err, "Artifact not found");
            })
            .ok()?;
        let data: PageData = fs::read_to_string(&sidecar)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .or_else(|| {
                tracing::debug!(path = %sidecar.display(), "Sidecar missing or malformed");
                None
            })?;

        Some(LoadedPage { html, data })
    }
}
