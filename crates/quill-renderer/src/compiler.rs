//! Markdown compilation into render artifacts.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::heading::{Heading, extract_headings, heading_id};
use crate::highlight::Highlighter;
use crate::plain_text::strip_markdown;

/// Everything the compiler produces for one document body.
#[derive(Clone, Debug)]
pub struct Compiled {
    /// Self-contained HTML render artifact.
    pub html: String,
    /// Table-of-contents headings (levels 2-3).
    pub headings: Vec<Heading>,
    /// Flattened plain text for search indexing.
    pub plain_text: String,
}

/// Unrecoverable compile failure for a single document.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The configured highlighting stage failed.
    #[error(transparent)]
    Highlight(#[from] crate::highlight::HighlightError),
}

/// Compiles markdown bodies into render artifacts.
///
/// Rendering works by transforming the pulldown-cmark event stream: headings
/// are flattened to text and re-emitted with a deterministic anchor id, and
/// fenced code blocks are routed through the optional [`Highlighter`]. All
/// other events pass through to the stock HTML writer.
///
/// The heading ids embedded here come from [`heading_id`], the same transform
/// [`extract_headings`] uses, so the artifact and the sidecar always agree.
pub struct Compiler {
    highlighter: Option<Box<dyn Highlighter>>,
    gfm: bool,
}

impl Compiler {
    /// Create a compiler with GFM enabled and no highlighting stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighter: None,
            gfm: true,
        }
    }

    /// Attach a syntax-highlighting stage.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Whether a highlighting stage is currently attached.
    #[must_use]
    pub fn has_highlighter(&self) -> bool {
        self.highlighter.is_some()
    }

    /// Drop the highlighting stage for the rest of this compiler's lifetime.
    ///
    /// Used by the build orchestrator after the stage's first failure.
    pub fn disable_highlighter(&mut self) {
        self.highlighter = None;
    }

    /// Compile a document body.
    ///
    /// Produces the render artifact, the heading list and the flattened
    /// search text in one pass over the source.
    pub fn compile(&self, body: &str) -> Result<Compiled, CompileError> {
        Ok(Compiled {
            html: self.render_html(body)?,
            headings: extract_headings(body),
            plain_text: strip_markdown(body),
        })
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    fn render_html(&self, markdown: &str) -> Result<String, CompileError> {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut events: Vec<Event> = Vec::new();
        // (level, flattened text) while inside a heading
        let mut heading: Option<(u8, String)> = None;
        // (language, buffered code) while inside a code block
        let mut code: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((heading_level_to_num(level), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = heading.take() {
                        let mut html = String::new();
                        write!(
                            html,
                            r#"<h{level} id="{}">{}</h{level}>"#,
                            escape_html(&heading_id(&text)),
                            escape_html(&text)
                        )
                        .unwrap();
                        events.push(Event::Html(html.into()));
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some((fence_language(&kind), String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, content)) = code.take() {
                        let inner = match &self.highlighter {
                            Some(h) => h.highlight(language.as_deref(), &content)?,
                            None => escape_html(&content),
                        };
                        events.push(Event::Html(code_block_html(language.as_deref(), &inner).into()));
                    }
                }
                Event::Text(text) => {
                    if let Some((_, buf)) = &mut heading {
                        buf.push_str(&text);
                    } else if let Some((_, buf)) = &mut code {
                        buf.push_str(&text);
                    } else {
                        events.push(Event::Text(text));
                    }
                }
                Event::Code(text) if heading.is_some() => {
                    if let Some((_, buf)) = &mut heading {
                        buf.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak if heading.is_some() => {
                    if let Some((_, buf)) = &mut heading {
                        buf.push(' ');
                    }
                }
                // Inline structure inside headings is flattened away; the
                // anchor id must match the plain heading text.
                _ if heading.is_some() || code.is_some() => {}
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Ok(html)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token from a fenced code block's info string.
fn fence_language(kind: &CodeBlockKind) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .filter(|lang| !lang.is_empty())
            .map(ToOwned::to_owned),
        CodeBlockKind::Indented => None,
    }
}

fn code_block_html(language: Option<&str>, inner: &str) -> String {
    match language {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{inner}</code></pre>"#,
            escape_html(lang)
        ),
        None => format!("<pre><code>{inner}</code></pre>"),
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::highlight::HighlightError;

    struct UppercaseHighlighter;

    impl Highlighter for UppercaseHighlighter {
        fn highlight(&self, _language: Option<&str>, code: &str) -> Result<String, HighlightError> {
            Ok(escape_html(&code.to_uppercase()))
        }
    }

    struct FailingHighlighter;

    impl Highlighter for FailingHighlighter {
        fn highlight(&self, _language: Option<&str>, _code: &str) -> Result<String, HighlightError> {
            Err(HighlightError::new("grammar unavailable"))
        }
    }

    #[test]
    fn test_compile_embeds_heading_ids() {
        let compiled = Compiler::new().compile("## Getting Started\n\ntext\n").unwrap();
        assert!(compiled.html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#));
    }

    #[test]
    fn test_embedded_ids_match_extracted_headings() {
        let body = "## Using `quill build`\n\n### The *fast* path\n\n## What's new?\n";
        let compiled = Compiler::new().compile(body).unwrap();
        for heading in &compiled.headings {
            let anchor = format!(r#"id="{}""#, heading.id);
            assert!(
                compiled.html.contains(&anchor),
                "missing anchor for {heading:?} in {}",
                compiled.html
            );
        }
    }

    #[test]
    fn test_intraword_underscores_keep_cross_pass_agreement() {
        let body = "## run my_test_helper now\n";
        let compiled = Compiler::new().compile(body).unwrap();
        assert_eq!(compiled.headings[0].id, "run-my_test_helper-now");
        assert!(
            compiled
                .html
                .contains(r#"<h2 id="run-my_test_helper-now">run my_test_helper now</h2>"#)
        );
    }

    #[test]
    fn test_compile_code_block_without_highlighter() {
        let compiled = Compiler::new().compile("```rust\nfn main() {}\n```\n").unwrap();
        assert!(
            compiled
                .html
                .contains(r#"<pre><code class="language-rust">fn main() {}"#)
        );
    }

    #[test]
    fn test_compile_code_block_with_highlighter() {
        let compiler = Compiler::new().with_highlighter(Box::new(UppercaseHighlighter));
        let compiled = compiler.compile("```rust\nfn main() {}\n```\n").unwrap();
        assert!(compiled.html.contains("FN MAIN() {}"));
    }

    #[test]
    fn test_compile_highlighter_failure_is_compile_error() {
        let compiler = Compiler::new().with_highlighter(Box::new(FailingHighlighter));
        let result = compiler.compile("```rust\nfn main() {}\n```\n");
        assert!(matches!(result, Err(CompileError::Highlight(_))));
    }

    #[test]
    fn test_disable_highlighter_recovers() {
        let mut compiler = Compiler::new().with_highlighter(Box::new(FailingHighlighter));
        assert!(compiler.compile("```\ncode\n```\n").is_err());

        compiler.disable_highlighter();
        assert!(!compiler.has_highlighter());
        let compiled = compiler.compile("```\ncode\n```\n").unwrap();
        assert!(compiled.html.contains("<pre><code>code"));
    }

    #[test]
    fn test_compile_produces_plain_text_and_headings() {
        let body = "## Install\n\nRun **this** now.\n";
        let compiled = Compiler::new().compile(body).unwrap();
        assert_eq!(compiled.headings.len(), 1);
        assert_eq!(compiled.plain_text, "Install\nRun this now.");
    }

    #[test]
    fn test_compile_gfm_table() {
        let body = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let compiled = Compiler::new().compile(body).unwrap();
        assert!(compiled.html.contains("<table>"));
    }

    #[test]
    fn test_heading_text_escaped_in_artifact() {
        let compiled = Compiler::new().compile("## a < b\n").unwrap();
        assert!(compiled.html.contains(r#"<h2 id="a-b">a &lt; b</h2>"#));
    }
}
