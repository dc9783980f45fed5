//! Frontmatter extraction and markdown compilation.
//!
//! This crate turns a raw document into the pieces the build phase writes to
//! disk:
//!
//! - [`frontmatter::extract`] splits a leading `---` metadata block from the
//!   body without touching either.
//! - [`Compiler`] renders the body to a self-contained HTML artifact, embeds
//!   deterministic heading anchors, and flattens the body to plain search
//!   text.
//! - [`extract_headings`] is the independent heading pass used for tables of
//!   contents; it shares [`heading_id`] with the compiler so both passes
//!   agree on anchor ids for the same heading.
//!
//! Syntax highlighting is an optional enhancement behind the [`Highlighter`]
//! trait. Without one, code blocks render as `<pre><code class="language-X">`
//! for client-side highlighting.

pub mod frontmatter;
mod compiler;
mod heading;
mod highlight;
mod plain_text;
mod sidecar;

pub use compiler::{Compiled, CompileError, Compiler, escape_html};
pub use frontmatter::{Frontmatter, ParseError};
pub use heading::{Heading, extract_headings, heading_id};
pub use highlight::{HighlightError, Highlighter};
pub use plain_text::strip_markdown;
pub use sidecar::PageData;
