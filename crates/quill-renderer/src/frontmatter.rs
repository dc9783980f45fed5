//! Frontmatter block extraction.
//!
//! A document may start with a YAML metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Installation
//! description: Getting set up
//! ---
//! Body starts here.
//! ```
//!
//! The block is an open string-keyed map: `title` and `description` have
//! typed accessors, every other key passes through untouched. A document
//! without a block yields an empty map and an unchanged body. A block that is
//! present but malformed is a [`ParseError`]; no repair is attempted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open string-keyed frontmatter map.
///
/// Keys are kept in a `BTreeMap` so sidecar serialization is deterministic
/// across builds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, Value>);

impl Frontmatter {
    /// Document title, when present as a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Document description, when present as a string.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    /// Raw value for any key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Error type for frontmatter extraction.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// An opening `---` line without a closing one.
    #[error("frontmatter block is not terminated by a closing '---' line")]
    Unterminated,

    /// The block is present but is not a valid YAML mapping.
    #[error("invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a leading frontmatter block from a raw document.
///
/// Returns the parsed map and the body text. The body is returned unchanged
/// apart from removing the block itself and the newline that terminates the
/// closing delimiter.
pub fn extract(raw: &str) -> Result<(Frontmatter, &str), ParseError> {
    let Some(after_open) = strip_delimiter_line(raw) else {
        return Ok((Frontmatter::default(), raw));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((parse_block(block)?, body));
        }
        offset += line.len();
    }

    Err(ParseError::Unterminated)
}

/// Strip a `---` line from the start of the text, if present.
///
/// The delimiter must be exactly `---` followed by a newline; a horizontal
/// rule like `----` is not an opening delimiter.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest.strip_prefix('\n')
}

fn parse_block(block: &str) -> Result<Frontmatter, ParseError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    Ok(serde_yaml::from_str(block)?)
}
