//! Manifest and search-corpus types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One catalog entry per compiled document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Slug segments identifying the document within its version.
    pub slug: Vec<String>,
    /// Display title (frontmatter title or slug path fallback).
    pub title: String,
    /// Short description (frontmatter description or empty).
    pub description: String,
}

/// Per-version catalog of document identities and display titles.
///
/// Serialized as a map of version to entry array. Versions are kept in a
/// `BTreeMap` so repeated builds over unchanged input serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, Vec<ManifestEntry>>);

impl Manifest {
    /// Create an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a version's catalog, preserving insertion order.
    pub fn push(&mut self, version: &str, entry: ManifestEntry) {
        self.0.entry(version.to_owned()).or_default().push(entry);
    }

    /// Entries for a version, empty for unknown versions.
    #[must_use]
    pub fn entries(&self, version: &str) -> &[ManifestEntry] {
        self.0.get(version).map_or(&[], Vec::as_slice)
    }

    /// Look up the display title for a slug within a version.
    #[must_use]
    pub fn title_for(&self, version: &str, slug: &[String]) -> Option<&str> {
        self.entries(version)
            .iter()
            .find(|e| e.slug == slug)
            .map(|e| e.title.as_str())
    }

    /// All known versions, in sorted order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of entries across all versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One searchable document within a version's corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Slug path (segments joined with `/`).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Flattened plain text of the document body.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(slug: &[&str], title: &str) -> ManifestEntry {
        ManifestEntry {
            slug: slug.iter().map(ToString::to_string).collect(),
            title: title.to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn test_entries_unknown_version_is_empty() {
        let manifest = Manifest::new();
        assert!(manifest.entries("v9").is_empty());
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut manifest = Manifest::new();
        manifest.push("v1", entry(&["b"], "B"));
        manifest.push("v1", entry(&["a"], "A"));

        let titles: Vec<_> = manifest.entries("v1").iter().map(|e| &e.title).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_title_lookup_by_slug() {
        let mut manifest = Manifest::new();
        manifest.push("v1", entry(&["guide", "start"], "Start"));

        let slug = vec!["guide".to_owned(), "start".to_owned()];
        assert_eq!(manifest.title_for("v1", &slug), Some("Start"));
        assert_eq!(manifest.title_for("v2", &slug), None);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut manifest = Manifest::new();
        manifest.push("v1", entry(&["index"], "Home"));

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "v1": [{ "slug": ["index"], "title": "Home", "description": "" }]
            })
        );
    }

    #[test]
    fn test_versions_sorted() {
        let mut manifest = Manifest::new();
        manifest.push("v2", entry(&["a"], "A"));
        manifest.push("v1", entry(&["b"], "B"));

        let versions: Vec<_> = manifest.versions().collect();
        assert_eq!(versions, vec!["v1", "v2"]);
    }
}
