//! Document discovery by filesystem walking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quill_meta::DocId;

/// A discovered source document.
#[derive(Debug, Clone)]
pub(crate) struct SourceDoc {
    /// Identity derived from the content-relative path.
    pub id: DocId,
    /// Absolute (or content-rooted) path to the markdown file.
    pub path: PathBuf,
}

/// Discover every document under `<version>/docs/` in the content root.
///
/// Versions and directory entries are visited in sorted order so repeated
/// builds process documents in the same sequence. Hidden and `_`-prefixed
/// files are skipped.
pub(crate) fn discover(content_dir: &Path) -> io::Result<Vec<SourceDoc>> {
    let mut docs = Vec::new();

    for version_dir in sorted_entries(content_dir)? {
        if !version_dir.is_dir() {
            continue;
        }
        let docs_dir = version_dir.join("docs");
        if docs_dir.is_dir() {
            walk_docs(content_dir, &docs_dir, &mut docs);
        }
    }

    Ok(docs)
}

fn walk_docs(content_dir: &Path, dir: &Path, docs: &mut Vec<SourceDoc>) {
    let Ok(entries) = sorted_entries(dir) else {
        tracing::warn!(dir = %dir.display(), "Failed to read directory, skipping");
        return;
    };

    for path in entries {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let Some(name) = name else { continue };
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }

        if path.is_dir() {
            walk_docs(content_dir, &path, docs);
        } else if let Ok(rel) = path.strip_prefix(content_dir) {
            if let Some(id) = DocId::from_content_path(rel) {
                docs.push(SourceDoc {
                    id,
                    path: path.clone(),
                });
            }
        }
    }
}

/// Directory entries sorted by file name.
fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}
