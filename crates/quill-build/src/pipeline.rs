//! Sequential build pipeline with sticky highlight degradation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use quill_meta::{DocId, Manifest, ManifestEntry, SearchDocument};
use quill_renderer::{CompileError, Compiler, PageData, ParseError, frontmatter};

use crate::discover::{SourceDoc, discover};

/// Configuration for a build run.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Content root containing `<version>/docs/` trees.
    pub content_dir: PathBuf,
    /// Output directory for artifacts, manifest and corpora.
    pub out_dir: PathBuf,
    /// What to do when a single document fails.
    pub policy: ErrorPolicy,
}

impl BuildOptions {
    /// Create options with the default [`ErrorPolicy::Skip`].
    #[must_use]
    pub fn new(content_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            content_dir,
            out_dir,
            policy: ErrorPolicy::Skip,
        }
    }
}

/// Policy for document-scoped failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure and continue with the remaining documents.
    #[default]
    Skip,
    /// Abort the build on the first failing document.
    Fatal,
}

/// Outcome of a completed build run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Documents compiled and written as artifact pairs.
    pub produced: usize,
    /// Documents skipped due to document-scoped errors.
    pub skipped: usize,
    /// Whether the highlighting stage was disabled during the run.
    pub highlight_degraded: bool,
}

/// Error terminating a build run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Filesystem failure outside any single document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest or corpus serialization failure.
    #[error("failed to serialize build output: {0}")]
    Json(#[from] serde_json::Error),

    /// A document failed under [`ErrorPolicy::Fatal`].
    #[error("document '{path}' failed: {source}")]
    Document {
        /// Content-relative identity of the failing document.
        path: String,
        #[source]
        source: DocumentError,
    },

    /// Documents were discovered but none could be produced.
    #[error("no documents could be produced ({discovered} discovered, all failed)")]
    NothingProduced {
        /// How many documents discovery found.
        discovered: usize,
    },
}

/// Document-scoped failure, non-fatal under [`ErrorPolicy::Skip`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Malformed frontmatter block.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Compile failure that persisted after degradation.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The source or an output file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The metadata sidecar could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Drives the whole build: discovery, compilation, artifact and index writes.
///
/// Processing is strictly sequential in discovery order so the manifest and
/// corpora are reproducible. The optional highlighting stage degrades
/// stickily: its first failure disables it for the remainder of the run, the
/// failing document is recompiled once without it, and later documents never
/// attempt it.
pub struct BuildPipeline {
    options: BuildOptions,
    compiler: Compiler,
}

impl BuildPipeline {
    /// Create a pipeline with a default compiler (no highlighting stage).
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            compiler: Compiler::new(),
        }
    }

    /// Replace the compiler, e.g. to attach a highlighting stage.
    #[must_use]
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Run the build to completion.
    ///
    /// Returns a summary on success. An empty content tree is a successful
    /// no-op; discovering documents but producing none is
    /// [`BuildError::NothingProduced`].
    pub fn run(mut self) -> Result<BuildSummary, BuildError> {
        let docs = discover(&self.options.content_dir)?;
        if docs.is_empty() {
            tracing::info!("No documents found, nothing to compile");
            return Ok(BuildSummary::default());
        }
        tracing::info!(document_count = docs.len(), "Starting build");

        let mut manifest = Manifest::new();
        let mut corpora: BTreeMap<String, Vec<SearchDocument>> = BTreeMap::new();
        let mut summary = BuildSummary::default();
        let mut degraded = false;

        for doc in &docs {
            let doc_path = format!("{}/docs/{}", doc.id.version, doc.id.slug_path());
            match self.process(doc, &mut degraded) {
                Ok((entry, search_doc)) => {
                    manifest.push(&doc.id.version, entry);
                    corpora.entry(doc.id.version.clone()).or_default().push(search_doc);
                    summary.produced += 1;
                }
                Err(err) => {
                    if self.options.policy == ErrorPolicy::Fatal {
                        return Err(BuildError::Document {
                            path: doc_path,
                            source: err,
                        });
                    }
                    tracing::warn!(path = %doc_path, error = %err, "Skipping document");
                    summary.skipped += 1;
                }
            }
        }
        summary.highlight_degraded = degraded;

        if summary.produced == 0 {
            return Err(BuildError::NothingProduced {
                discovered: docs.len(),
            });
        }

        self.write_manifest(&manifest)?;
        self.write_corpora(&corpora)?;

        tracing::info!(
            produced = summary.produced,
            skipped = summary.skipped,
            highlight_degraded = summary.highlight_degraded,
            "Build finished"
        );
        Ok(summary)
    }

    /// Compile one document and write its artifact pair.
    ///
    /// The manifest entry and search document are only returned once both
    /// files are on disk, so catalog entries and artifact pairs always appear
    /// together.
    fn process(
        &mut self,
        doc: &SourceDoc,
        degraded: &mut bool,
    ) -> Result<(ManifestEntry, SearchDocument), DocumentError> {
        let raw = fs::read_to_string(&doc.path)?;
        let (fm, body) = frontmatter::extract(&raw)?;

        let compiled = match self.compiler.compile(body) {
            Ok(compiled) => compiled,
            Err(CompileError::Highlight(err)) if self.compiler.has_highlighter() => {
                tracing::warn!(
                    error = %err,
                    "Highlighting failed, disabling it for the remainder of the build"
                );
                self.compiler.disable_highlighter();
                *degraded = true;
                self.compiler.compile(body)?
            }
            Err(err) => return Err(err.into()),
        };

        self.write_artifact_pair(&doc.id, &compiled.html, &PageData {
            frontmatter: fm.clone(),
            headings: compiled.headings,
            plain_text: compiled.plain_text.clone(),
        })?;

        let slug_path = doc.id.slug_path();
        let title = fm.title().unwrap_or(&slug_path).to_owned();
        let description = fm.description().unwrap_or("").to_owned();

        let entry = ManifestEntry {
            slug: doc.id.slug.clone(),
            title: title.clone(),
            description: description.clone(),
        };
        let search_doc = SearchDocument {
            slug: slug_path,
            title,
            description,
            content: compiled.plain_text,
        };
        Ok((entry, search_doc))
    }

    fn write_artifact_pair(
        &self,
        id: &DocId,
        html: &str,
        data: &PageData,
    ) -> Result<(), DocumentError> {
        let artifact = quill_meta::artifact_path(&self.options.out_dir, id);
        let sidecar = quill_meta::sidecar_path(&self.options.out_dir, id);
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&artifact, html)?;
        fs::write(&sidecar, serde_json::to_string_pretty(data)?)?;
        tracing::debug!(artifact = %artifact.display(), "Wrote artifact pair");
        Ok(())
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<(), BuildError> {
        let path = quill_meta::manifest_path(&self.options.out_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
        tracing::info!(path = %path.display(), entries = manifest.len(), "Wrote manifest");
        Ok(())
    }

    fn write_corpora(
        &self,
        corpora: &BTreeMap<String, Vec<SearchDocument>>,
    ) -> Result<(), BuildError> {
        for (version, entries) in corpora {
            let path = quill_meta::corpus_path(&self.options.out_dir, version);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, serde_json::to_string_pretty(entries)?)?;
            tracing::info!(path = %path.display(), documents = entries.len(), "Wrote search corpus");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use quill_renderer::{HighlightError, Highlighter, escape_html};

    use super::*;

    /// Highlighter that fails on the nth code block it sees.
    struct FailOnNth {
        seen: AtomicUsize,
        fail_at: usize,
    }

    impl FailOnNth {
        fn new(fail_at: usize) -> Self {
            Self {
                seen: AtomicUsize::new(0),
                fail_at,
            }
        }
    }

    impl Highlighter for FailOnNth {
        fn highlight(&self, _language: Option<&str>, code: &str) -> Result<String, HighlightError> {
            let n = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_at {
                return Err(HighlightError::new("grammar crashed"));
            }
            Ok(format!("<span class=\"hl\">{}</span>", escape_html(code)))
        }
    }

    fn write_doc(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn options(temp: &tempfile::TempDir) -> BuildOptions {
        BuildOptions::new(temp.path().join("content"), temp.path().join("out"))
    }

    #[test]
    fn test_build_writes_artifact_pair_manifest_and_corpus() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(
            &opts.content_dir,
            "v1/docs/index.md",
            "---\ntitle: Home\ndescription: Start here\n---\n## Welcome\n\nHello.\n",
        );

        let summary = BuildPipeline::new(opts.clone()).run().unwrap();
        assert_eq!(summary.produced, 1);
        assert_eq!(summary.skipped, 0);

        let html =
            fs::read_to_string(opts.out_dir.join("content/v1/docs/index.html")).unwrap();
        assert!(html.contains(r#"<h2 id="welcome">Welcome</h2>"#));

        let sidecar: PageData = serde_json::from_str(
            &fs::read_to_string(opts.out_dir.join("content/v1/docs/index.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(sidecar.frontmatter.title(), Some("Home"));
        assert_eq!(sidecar.headings.len(), 1);
        assert_eq!(sidecar.plain_text, "Welcome\nHello.");

        let manifest: Manifest = serde_json::from_str(
            &fs::read_to_string(opts.out_dir.join("manifest.json")).unwrap(),
        )
        .unwrap();
        let entries = manifest.entries("v1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Home");
        assert_eq!(entries[0].description, "Start here");

        let corpus: Vec<SearchDocument> = serde_json::from_str(
            &fs::read_to_string(opts.out_dir.join("search/v1.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(corpus[0].slug, "index");
        assert_eq!(corpus[0].content, "Welcome\nHello.");
    }

    #[test]
    fn test_title_falls_back_to_slug_path() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(&opts.content_dir, "v1/docs/guide/start.md", "No frontmatter here.\n");

        BuildPipeline::new(opts.clone()).run().unwrap();

        let manifest: Manifest = serde_json::from_str(
            &fs::read_to_string(opts.out_dir.join("manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.entries("v1")[0].title, "guide/start");
        assert_eq!(manifest.entries("v1")[0].description, "");
    }

    #[test]
    fn test_repeated_builds_are_byte_identical() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(
            &opts.content_dir,
            "v1/docs/a.md",
            "---\ntitle: A\n---\nAlpha.\n",
        );
        write_doc(&opts.content_dir, "v1/docs/b.md", "Beta.\n");
        write_doc(&opts.content_dir, "v2/docs/c.md", "Gamma.\n");

        BuildPipeline::new(opts.clone()).run().unwrap();
        let manifest_first = fs::read(opts.out_dir.join("manifest.json")).unwrap();
        let corpus_first = fs::read(opts.out_dir.join("search/v1.json")).unwrap();

        BuildPipeline::new(opts.clone()).run().unwrap();
        let manifest_second = fs::read(opts.out_dir.join("manifest.json")).unwrap();
        let corpus_second = fs::read(opts.out_dir.join("search/v1.json")).unwrap();

        assert_eq!(manifest_first, manifest_second);
        assert_eq!(corpus_first, corpus_second);
    }

    #[test]
    fn test_malformed_frontmatter_is_skipped_and_run_continues() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(&opts.content_dir, "v1/docs/bad.md", "---\ntitle: [broken\n---\nBody.\n");
        write_doc(&opts.content_dir, "v1/docs/good.md", "Fine.\n");

        let summary = BuildPipeline::new(opts.clone()).run().unwrap();
        assert_eq!(summary.produced, 1);
        assert_eq!(summary.skipped, 1);

        assert!(!opts.out_dir.join("content/v1/docs/bad.html").exists());
        assert!(opts.out_dir.join("content/v1/docs/good.html").exists());
    }

    #[test]
    fn test_fatal_policy_aborts_on_first_document_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut opts = options(&temp);
        opts.policy = ErrorPolicy::Fatal;
        write_doc(&opts.content_dir, "v1/docs/bad.md", "---\nbroken: [\n---\n");
        write_doc(&opts.content_dir, "v1/docs/good.md", "Fine.\n");

        let err = BuildPipeline::new(opts).run().unwrap_err();
        assert!(matches!(err, BuildError::Document { .. }));
    }

    #[test]
    fn test_all_documents_failing_is_total_failure() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(&opts.content_dir, "v1/docs/bad.md", "---\nbroken: [\n---\n");

        let err = BuildPipeline::new(opts).run().unwrap_err();
        assert!(matches!(err, BuildError::NothingProduced { discovered: 1 }));
    }

    #[test]
    fn test_empty_content_tree_is_clean_noop() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        fs::create_dir_all(&opts.content_dir).unwrap();

        let summary = BuildPipeline::new(opts).run().unwrap();
        assert_eq!(summary, BuildSummary::default());
    }

    #[test]
    fn test_highlight_failure_degrades_stickily() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        // Ten documents, one code block each, sorted as doc-00..doc-09.
        for i in 0..10 {
            write_doc(
                &opts.content_dir,
                &format!("v1/docs/doc-{i:02}.md"),
                &format!("Doc {i}.\n\n```rust\nlet x = {i};\n```\n"),
            );
        }

        let pipeline = BuildPipeline::new(opts.clone())
            .with_compiler(Compiler::new().with_highlighter(Box::new(FailOnNth::new(3))));
        let summary = pipeline.run().unwrap();

        assert_eq!(summary.produced, 10);
        assert_eq!(summary.skipped, 0);
        assert!(summary.highlight_degraded);

        for i in 0..10 {
            let html = fs::read_to_string(
                opts.out_dir.join(format!("content/v1/docs/doc-{i:02}.html")),
            )
            .unwrap();
            if i < 2 {
                assert!(html.contains("class=\"hl\""), "doc {i} should be highlighted");
            } else {
                assert!(!html.contains("class=\"hl\""), "doc {i} should be plain");
            }
        }
    }

    #[test]
    fn test_manifest_groups_versions() {
        let temp = tempfile::tempdir().unwrap();
        let opts = options(&temp);
        write_doc(&opts.content_dir, "v1/docs/a.md", "A.\n");
        write_doc(&opts.content_dir, "v2/docs/b.md", "B.\n");

        BuildPipeline::new(opts.clone()).run().unwrap();

        let manifest: Manifest = serde_json::from_str(
            &fs::read_to_string(opts.out_dir.join("manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.entries("v1").len(), 1);
        assert_eq!(manifest.entries("v2").len(), 1);
        assert!(opts.out_dir.join("search/v1.json").exists());
        assert!(opts.out_dir.join("search/v2.json").exists());
    }
}
