//! Inverted prefix index over one version's search corpus.

use std::collections::{BTreeMap, HashMap};

use quill_meta::SearchDocument;

/// State of a version's index.
///
/// `Unavailable` is a cached terminal state: a version whose corpus could
/// not be read stays unavailable for the process lifetime.
pub(crate) enum VersionIndex {
    Ready(Index),
    Unavailable,
}

/// Inverted index: token to posting list of document ordinals.
///
/// A document contributes one posting per token occurrence, so posting
/// counts double as term frequencies for ranking. Tokens are kept in a
/// `BTreeMap` so prefix lookup is a bounded range scan.
pub(crate) struct Index {
    docs: Vec<SearchDocument>,
    terms: BTreeMap<String, Vec<u32>>,
}

impl Index {
    pub(crate) fn build(docs: Vec<SearchDocument>) -> Self {
        let mut terms: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for (ordinal, doc) in docs.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let ordinal = ordinal as u32;
            for field in [&doc.title, &doc.description, &doc.content] {
                for token in tokenize(field) {
                    terms.entry(token).or_default().push(ordinal);
                }
            }
        }
        Self { docs, terms }
    }

    pub(crate) fn document(&self, ordinal: u32) -> &SearchDocument {
        &self.docs[ordinal as usize]
    }

    /// Documents with at least one indexed token starting with `prefix`,
    /// mapped to the number of matched postings.
    pub(crate) fn postings_for_prefix(&self, prefix: &str) -> HashMap<u32, u32> {
        let mut matched: HashMap<u32, u32> = HashMap::new();
        for (term, postings) in self.terms.range(prefix.to_owned()..) {
            if !term.starts_with(prefix) {
                break;
            }
            for &ordinal in postings {
                *matched.entry(ordinal).or_insert(0) += 1;
            }
        }
        matched
    }
}

/// Lowercase alphanumeric runs of `text`.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|run| !run.is_empty())
        .map(str::to_lowercase)
}
