//! Document identity derived from source location.

use std::path::Path;

/// Identity of a document within the corpus.
///
/// Derived from the document's location under `<version>/docs/...` relative
/// to the content root. The `docs` segment itself is not part of the slug.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocId {
    /// Version directory name (e.g., "v1").
    pub version: String,
    /// Ordered slug segments (e.g., `["getting-started", "installation"]`).
    pub slug: Vec<String>,
}

impl DocId {
    /// Create an identity from explicit parts.
    #[must_use]
    pub fn new(version: impl Into<String>, slug: Vec<String>) -> Self {
        Self {
            version: version.into(),
            slug,
        }
    }

    /// Derive an identity from a content-relative source path.
    ///
    /// The path must have the shape `<version>/docs/<...>.md`; anything else
    /// (wrong extension, missing `docs` segment, no slug segments) returns
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use quill_meta::DocId;
    ///
    /// let id = DocId::from_content_path(Path::new("v1/docs/guide/start.md")).unwrap();
    /// assert_eq!(id.version, "v1");
    /// assert_eq!(id.slug, vec!["guide", "start"]);
    /// ```
    #[must_use]
    pub fn from_content_path(rel_path: &Path) -> Option<Self> {
        if rel_path.extension().is_none_or(|e| e != "md") {
            return None;
        }
        let stripped = rel_path.with_extension("");
        let mut parts = stripped
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned());

        let version = parts.next()?;
        if parts.next()? != "docs" {
            return None;
        }
        let slug: Vec<String> = parts.collect();
        if slug.is_empty() {
            return None;
        }
        Some(Self { version, slug })
    }

    /// Slug segments joined with `/` (e.g., "guide/start").
    #[must_use]
    pub fn slug_path(&self) -> String {
        self.slug.join("/")
    }
}
