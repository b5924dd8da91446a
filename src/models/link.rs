//! Ticket link request models.

use serde::{Deserialize, Serialize};

/// Relationship between two linked objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Normal,
    Parent,
    Child,
}

/// Body of the link `add` and `remove` endpoints.
///
/// The target is addressed by id, the source by its ticket *number*.
/// Zammad currently only links tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequest {
    pub link_type: LinkType,
    pub link_object_target: String,
    pub link_object_target_value: u64,
    pub link_object_source: String,
    pub link_object_source_number: String,
}

impl LinkRequest {
    /// Link ticket `target_id` with the ticket numbered `source_number`.
    pub fn tickets(target_id: u64, source_number: impl Into<String>) -> Self {
        Self {
            link_type: LinkType::Normal,
            link_object_target: "Ticket".to_string(),
            link_object_target_value: target_id,
            link_object_source: "Ticket".to_string(),
            link_object_source_number: source_number.into(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }
}
