//! Markdown flattening for search indexing.

use std::sync::LazyLock;

use regex::Regex;

use crate::heading::strip_underscore_emphasis;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());
static HEADING_MARKERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static STAR_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}([^*]+)\*{1,3}").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*_]{3,}\s*$").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BULLET_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Flatten markdown to plain text for search indexing.
///
/// Removes fenced and inline code, heading markers, emphasis markers, links
/// (keeping link text), images (keeping alt text), horizontal rules, embedded
/// HTML tags and list markers, then collapses blank-line runs and trims.
#[must_use]
pub fn strip_markdown(markdown: &str) -> String {
    let text = FENCED_CODE.replace_all(markdown, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = HEADING_MARKERS.replace_all(&text, "");
    let text = STAR_EMPHASIS.replace_all(&text, "$1");
    let text = strip_underscore_emphasis(&text);
    // Images before links so alt text survives without a stray '!'.
    let text = IMAGE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = BULLET_MARKER.replace_all(&text, "");
    let text = ORDERED_MARKER.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strips_fenced_and_inline_code() {
        let md = "Before\n\n```rust\nfn main() {}\n```\n\nUse `quill` here.";
        assert_eq!(strip_markdown(md), "Before\nUse  here.");
    }

    #[test]
    fn test_strips_heading_and_emphasis_markers() {
        let md = "## Install\n\nThis is **bold** and _italic_ text.";
        assert_eq!(strip_markdown(md), "Install\nThis is bold and italic text.");
    }

    #[test]
    fn test_links_keep_text_images_keep_alt() {
        let md = "See [the guide](https://example.com) and ![a diagram](img.png).";
        assert_eq!(strip_markdown(md), "See the guide and a diagram.");
    }

    #[test]
    fn test_strips_rules_tags_and_list_markers() {
        let md = "---\n\n<div>\n\n- first\n- second\n\n1. third\n</div>\n";
        assert_eq!(strip_markdown(md), "first\nsecond\nthird");
    }

    #[test]
    fn test_collapses_blank_lines_and_trims() {
        let md = "\n\nA paragraph.\n\n\n\nAnother one.\n\n";
        assert_eq!(strip_markdown(md), "A paragraph.\nAnother one.");
    }

    #[test]
    fn test_intraword_underscores_survive() {
        let md = "Call my_test_helper with _care_.";
        assert_eq!(strip_markdown(md), "Call my_test_helper with care.");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_markdown("just words"), "just words");
    }
}
