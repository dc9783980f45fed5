//! Sidebar tree assembly from per-directory ordering metadata.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::loader::ContentStore;

/// File name of the per-directory ordering metadata.
const ORDERING_FILE: &str = "_meta.json";

/// Parsed ordering metadata for one content directory.
///
/// Only names listed in `pages` appear in the navigation tree; documents and
/// directories not listed are excluded.
#[derive(Debug, Default, Deserialize)]
pub struct OrderingFile {
    /// Display title when this directory appears as a folder node.
    #[serde(default)]
    pub title: Option<String>,
    /// Child names (file stems or directory names) in display order.
    #[serde(default)]
    pub pages: Vec<String>,
}

/// One node of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavNode {
    /// A directory with its own ordering file.
    Folder {
        /// Folder display title.
        title: String,
        /// Ordered child nodes.
        children: Vec<NavNode>,
    },
    /// A single document.
    Leaf {
        /// Document display title.
        title: String,
        /// Link target (`/docs/<slug>`, or `/docs` for the index page).
        href: String,
    },
}

/// Builds the sidebar tree for a version from ordering metadata.
///
/// Ordering files are read fresh on every call: first the whole version's
/// metadata is snapshotted, then the tree is assembled from the snapshot, so
/// a build finishing mid-call cannot produce a tree that mixes old and new
/// ordering.
pub struct Navigation {
    content_dir: PathBuf,
    store: Arc<ContentStore>,
}

impl Navigation {
    /// Create a builder over a content root, resolving titles via `store`.
    #[must_use]
    pub fn new(content_dir: PathBuf, store: Arc<ContentStore>) -> Self {
        Self { content_dir, store }
    }

    /// Assemble the navigation tree for a version.
    ///
    /// A version without ordering metadata yields an empty tree.
    #[must_use]
    pub fn tree(&self, version: &str) -> Vec<NavNode> {
        let snapshot = self.snapshot(version);
        let Some(root) = snapshot.get("") else {
            return Vec::new();
        };
        self.assemble(version, &snapshot, root, "")
    }

    /// Read every ordering file under `<version>/docs/` into memory.
    ///
    /// Keys are directory paths relative to the docs root, `""` for the root
    /// itself. A malformed file is logged and treated as absent.
    fn snapshot(&self, version: &str) -> HashMap<String, OrderingFile> {
        let docs_dir = self.content_dir.join(version).join("docs");
        let mut snapshot = HashMap::new();
        collect_ordering(&docs_dir, String::new(), &mut snapshot);
        snapshot
    }

    fn assemble(
        &self,
        version: &str,
        snapshot: &HashMap<String, OrderingFile>,
        ordering: &OrderingFile,
        dir: &str,
    ) -> Vec<NavNode> {
        ordering
            .pages
            .iter()
            .map(|name| {
                let path = if dir.is_empty() {
                    name.clone()
                } else {
                    format!("{dir}/{name}")
                };
                match snapshot.get(&path) {
                    Some(nested) => NavNode::Folder {
                        title: nested.title.clone().unwrap_or_else(|| name.clone()),
                        children: self.assemble(version, snapshot, nested, &path),
                    },
                    None => NavNode::Leaf {
                        title: self.leaf_title(version, &path, name),
                        href: leaf_href(&path),
                    },
                }
            })
            .collect()
    }

    /// Display title for a leaf, from the manifest when available.
    fn leaf_title(&self, version: &str, path: &str, name: &str) -> String {
        let slug: Vec<String> = path.split('/').map(ToOwned::to_owned).collect();
        self.store
            .manifest()
            .ok()
            .and_then(|m| m.title_for(version, &slug).map(ToOwned::to_owned))
            .unwrap_or_else(|| name.to_owned())
    }
}

fn leaf_href(path: &str) -> String {
    if path == "index" {
        "/docs".to_owned()
    } else {
        format!("/docs/{path}")
    }
}

/// Recursively gather ordering files, keyed by docs-relative directory.
fn collect_ordering(dir: &std::path::Path, rel: String, out: &mut HashMap<String, OrderingFile>) {
    let meta_path = dir.join(ORDERING_FILE);
    match fs::read_to_string(&meta_path) {
        Ok(raw) => match serde_json::from_str::<OrderingFile>(&raw) {
            Ok(ordering) => {
                out.insert(rel.clone(), ordering);
            }
            Err(err) => {
                tracing::warn!(path = %meta_path.display(), error = %err, "Malformed ordering file");
            }
        },
        Err(_) => {
            // No ordering file here; subdirectories may still carry one.
        }
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        let child_rel = if rel.is_empty() {
            name
        } else {
            format!("{rel}/{name}")
        };
        collect_ordering(&path, child_rel, out);
    }
}
