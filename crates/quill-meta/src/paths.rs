//! Path mapping between document identities and build outputs.

use std::path::{Path, PathBuf};

use crate::DocId;

/// Path of the render artifact for a document.
#[must_use]
pub fn artifact_path(out_dir: &Path, id: &DocId) -> PathBuf {
    content_path(out_dir, id, "html")
}

/// Path of the metadata sidecar for a document.
#[must_use]
pub fn sidecar_path(out_dir: &Path, id: &DocId) -> PathBuf {
    content_path(out_dir, id, "json")
}

/// Path of the manifest file.
#[must_use]
pub fn manifest_path(out_dir: &Path) -> PathBuf {
    out_dir.join("manifest.json")
}

/// Path of a version's search corpus.
#[must_use]
pub fn corpus_path(out_dir: &Path, version: &str) -> PathBuf {
    out_dir.join("search").join(format!("{version}.json"))
}

// The extension is appended rather than set: a dot in a slug segment is part
// of the name, not an extension to replace.
fn content_path(out_dir: &Path, id: &DocId, ext: &str) -> PathBuf {
    let mut path = out_dir.join("content").join(&id.version).join("docs");
    if let Some((last, rest)) = id.slug.split_last() {
        for segment in rest {
            path.push(segment);
        }
        path.push(format!("{last}.{ext}"));
    }
    path
}
