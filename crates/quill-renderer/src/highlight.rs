//! Optional syntax-highlighting stage.

/// Error raised by a [`Highlighter`] implementation.
///
/// Highlighting is an enhancement, not a requirement: the build reacts to the
/// first failure by disabling the stage for the rest of the run rather than
/// failing the document.
#[derive(Debug, thiserror::Error)]
#[error("highlighting failed: {0}")]
pub struct HighlightError(String);

impl HighlightError {
    /// Create an error with a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Syntax highlighting backend for fenced code blocks.
///
/// Implementations receive the fence language (if any) and the raw code, and
/// return HTML-escaped markup for the inside of the `<code>` element. The
/// compiler wraps the result in `<pre><code class="language-X">` itself.
///
/// Quill ships no built-in implementation; embedders plug one in via
/// [`Compiler::with_highlighter`](crate::Compiler::with_highlighter). Without
/// one, code blocks are escaped verbatim and highlighting is left to the
/// client.
pub trait Highlighter: Send + Sync {
    /// Produce highlighted inner HTML for a code block.
    fn highlight(&self, language: Option<&str>, code: &str) -> Result<String, HighlightError>;
}
