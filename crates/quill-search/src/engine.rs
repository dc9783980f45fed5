//! Query execution over lazily loaded version indexes.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use quill_meta::SearchDocument;
use serde::Serialize;

use crate::index::{Index, VersionIndex, tokenize};

/// Result cap applied when callers have no better number.
pub const DEFAULT_LIMIT: usize = 10;

/// One search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Slug path of the matching document.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Short description.
    pub description: String,
}

/// Prefix search over per-version corpora in a build output directory.
///
/// Indexes are built lazily on a version's first query and cached for the
/// process lifetime. A version whose corpus is missing or unreadable is
/// recorded as unavailable and answers every query with no results; it is
/// never retried. Constructed once at bootstrap and shared via `Arc`.
pub struct SearchEngine {
    out_dir: PathBuf,
    indexes: RwLock<HashMap<String, Arc<VersionIndex>>>,
}

impl SearchEngine {
    /// Create an engine over a build output directory.
    #[must_use]
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Run a prefix query against one version.
    ///
    /// Every query token must prefix-match at least one indexed token of a
    /// document for it to be returned. Results are ranked by total matched
    /// postings, ties broken by corpus order, and capped at `limit`. A blank
    /// query returns no results without touching the index.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn query(&self, version: &str, text: &str, limit: usize) -> Vec<SearchHit> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let version_index = self.index(version);
        let VersionIndex::Ready(index) = &*version_index else {
            return Vec::new();
        };

        let mut tokens = tokenize(text);
        let Some(first) = tokens.next() else {
            return Vec::new();
        };

        // AND semantics: intersect per-token matches, accumulating scores.
        let mut matched = index.postings_for_prefix(&first);
        for token in tokens {
            let next = index.postings_for_prefix(&token);
            matched.retain(|ordinal, score| match next.get(ordinal) {
                Some(count) => {
                    *score += count;
                    true
                }
                None => false,
            });
            if matched.is_empty() {
                return Vec::new();
            }
        }

        let mut ranked: Vec<(u32, u32)> = matched.into_iter().collect();
        ranked.sort_by_key(|&(ordinal, score)| (Reverse(score), ordinal));
        ranked
            .into_iter()
            .take(limit)
            .map(|(ordinal, _)| hit(index.document(ordinal)))
            .collect()
    }

    /// The cached index for a version, building it on first access.
    fn index(&self, version: &str) -> Arc<VersionIndex> {
        if let Some(index) = self.indexes.read().unwrap().get(version) {
            return Arc::clone(index);
        }

        let built = Arc::new(self.load(version));
        let mut guard = self.indexes.write().unwrap();
        let entry = guard.entry(version.to_owned()).or_insert(built);
        Arc::clone(entry)
    }

    fn load(&self, version: &str) -> VersionIndex {
        let path = quill_meta::corpus_path(&self.out_dir, version);
        let docs: Vec<SearchDocument> = match fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|err| err.to_string()))
        {
            Ok(docs) => docs,
            Err(err) => {
                tracing::warn!(version, path = %path.display(), error = %err, "Search corpus unavailable");
                return VersionIndex::Unavailable;
            }
        };

        tracing::info!(version, documents = docs.len(), "Search index built");
        VersionIndex::Ready(Index::build(docs))
    }
}

fn hit(doc: &SearchDocument) -> SearchHit {
    SearchHit {
        slug: doc.slug.clone(),
        title: doc.title.clone(),
        description: doc.description.clone(),
    }
}
