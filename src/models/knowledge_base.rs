//! Knowledge base request models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings accepted by the knowledge base `manage` endpoint.
///
/// Unset fields are left out of the request so only the provided settings
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iconset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_highlight: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_header_link: Option<String>,

    /// Layout of the public homepage (e.g. `grid`, `list`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_layout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_layout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_feed_icon: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_address: Option<String>,
}

/// Publication state transitions for a knowledge base answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerPublicity {
    /// Visible to agents only.
    #[serde(rename = "internal")]
    Internally,
    #[serde(rename = "publish")]
    Publicly,
    Archive,
    Unarchive,
}

impl AnswerPublicity {
    /// Path segment of the transition endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internally => "internal",
            Self::Publicly => "publish",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
        }
    }
}

impl fmt::Display for AnswerPublicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_skip_unset_fields() {
        let settings = KnowledgeBaseSettings {
            active: Some(true),
            homepage_layout: Some("grid".to_string()),
            color_highlight: Some("#38ae6a".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "active": true,
                "homepage_layout": "grid",
                "color_highlight": "#38ae6a"
            })
        );
    }

    #[test]
    fn test_publicity_serializes_as_path_segment() {
        for publicity in [
            AnswerPublicity::Internally,
            AnswerPublicity::Publicly,
            AnswerPublicity::Archive,
            AnswerPublicity::Unarchive,
        ] {
            let json = serde_json::to_value(publicity).unwrap();
            assert_eq!(json, serde_json::json!(publicity.as_str()));
        }
    }
}
