//! Heading extraction and deterministic anchor ids.
//!
//! [`heading_id`] is the single id transform shared by the compiler (which
//! embeds ids into the rendered artifact) and [`extract_headings`] (the
//! independent pass over raw markdown used for tables of contents). Both
//! sides must produce identical ids for the same heading, so neither may
//! deviate from this function.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// A document heading eligible for the table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id, derived from `text` by [`heading_id`].
    pub id: String,
    /// Heading text with inline markers removed.
    pub text: String,
    /// Heading level (2 or 3).
    pub level: u8,
}

static NON_ID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{2,3})\s+(.+)$").unwrap());

// Inline markers stripped from heading display text. Code spans, links and
// images keep their inner text; emphasis markers are dropped.
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static INLINE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static STAR_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}([^*]+)\*{1,3}").unwrap());
static UNDERSCORE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{1,3}([^_]+)_{1,3}").unwrap());

/// Derive a deterministic anchor id from heading text.
///
/// Lowercases, strips characters that are not word characters, whitespace or
/// hyphens, then collapses whitespace runs to single hyphens.
#[must_use]
pub fn heading_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_ID_CHARS.replace_all(&lowered, "");
    WHITESPACE_RUN.replace_all(&stripped, "-").into_owned()
}

/// Extract h2 and h3 headings from raw markdown.
///
/// This pass is independent of the compiler: it works on the raw source so
/// it can run without rendering, but embeds the same [`heading_id`] the
/// compiler does.
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    ATX_HEADING
        .captures_iter(markdown)
        .map(|caps| {
            #[allow(clippy::cast_possible_truncation)]
            let level = caps[1].len() as u8;
            let text = clean_inline(caps[2].trim());
            let id = heading_id(&text);
            Heading { id, text, level }
        })
        .collect()
}

/// Strip inline markdown markers from heading text, keeping visible content.
fn clean_inline(text: &str) -> String {
    let text = INLINE_CODE.replace_all(text, "$1");
    let text = INLINE_IMAGE.replace_all(&text, "$1");
    let text = INLINE_LINK.replace_all(&text, "$1");
    let text = STAR_EMPHASIS.replace_all(&text, "$1");
    strip_underscore_emphasis(&text)
}

/// Strip underscore emphasis, leaving intraword underscores alone.
///
/// CommonMark does not open emphasis on a `_` flanked by word characters, so
/// the compiler renders `my_test_helper` literally; this pass must keep the
/// same text or the two heading-id passes diverge.
pub(crate) fn strip_underscore_emphasis(text: &str) -> String {
    UNDERSCORE_EMPHASIS
        .replace_all(text, |caps: &Captures| {
            let m = caps.get(0).unwrap();
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            let intraword = before.is_some_and(char::is_alphanumeric)
                || after.is_some_and(char::is_alphanumeric);
            if intraword {
                m.as_str().to_owned()
            } else {
                caps[1].to_owned()
            }
        })
        .into_owned()
}
