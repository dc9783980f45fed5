//! Metadata sidecar written alongside each render artifact.

use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;
use crate::heading::Heading;

/// Per-document metadata stored as the artifact's JSON sidecar.
///
/// The artifact pair (HTML + this sidecar) shares one path key; neither is
/// ever written without the other.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Frontmatter map, passed through untouched.
    pub frontmatter: Frontmatter,
    /// Table-of-contents headings.
    pub headings: Vec<Heading>,
    /// Flattened plain text used for search indexing.
    pub plain_text: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sidecar_field_names() {
        let data = PageData {
            frontmatter: Frontmatter::default(),
            headings: vec![Heading {
                id: "install".to_owned(),
                text: "Install".to_owned(),
                level: 2,
            }],
            plain_text: "Install".to_owned(),
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frontmatter": {},
                "headings": [{ "id": "install", "text": "Install", "level": 2 }],
                "plainText": "Install"
            })
        );
    }
}
