//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization, and [`RecordRow`] for tables.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tabled::Tabled;

use crate::Payload;

/// Attributes tried, in order, to label a record.
const LABEL_KEYS: [&str; 5] = ["title", "name", "login", "email", "number"];

/// Trait for human-readable key-value output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Value {
    fn pretty_print(&self) -> String {
        let Some(map) = self.as_object() else {
            return scalar(self);
        };

        let header = match (record_id(self), record_label(self)) {
            (Some(id), Some(label)) => format!("#{id} {label}"),
            (Some(id), None) => format!("#{id}"),
            (None, Some(label)) => label,
            (None, None) => "Record".to_string(),
        };
        let divider = "─".repeat(header.chars().count().max(30));
        let width = map.keys().map(|k| k.len()).max().unwrap_or(0) + 1;

        let mut lines = vec![header, divider];
        for (key, value) in map {
            // nested structures only make sense as JSON
            if value.is_object() || value.is_array() {
                continue;
            }
            let rendered = match key.as_str() {
                k if k.ends_with("_at") => format_timestamp(value),
                _ => scalar(value),
            };
            lines.push(format!("{:<width$} {}", format!("{key}:"), rendered));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Payload {
    fn pretty_print(&self) -> String {
        match self {
            Payload::Json(value) => value.pretty_print(),
            Payload::Raw(bytes) if bytes.is_empty() => "(empty response)".to_string(),
            Payload::Raw(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Table row for a listing.
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: String,
    pub label: String,
    pub updated: String,
}

impl From<&Value> for RecordRow {
    fn from(record: &Value) -> Self {
        Self {
            id: record_id(record).unwrap_or_default(),
            label: record_label(record).unwrap_or_default(),
            updated: record
                .get("updated_at")
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").map(scalar)
}

fn record_label(record: &Value) -> Option<String> {
    LABEL_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
        .map(scalar)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn format_timestamp(value: &Value) -> String {
    value
        .as_str()
        .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| scalar(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ticket_pretty_print_format() {
        let ticket = json!({
            "id": 1,
            "title": "Welcome to Zammad!",
            "state_id": 1,
            "updated_at": "2024-03-01T10:15:00.000Z",
            "article_ids": [1]
        });

        let output = ticket.pretty_print();
        assert!(output.starts_with("#1 Welcome to Zammad!"));
        assert!(output.contains("2024-03-01 10:15:00 UTC"));
        assert!(!output.contains("article_ids"));
    }

    #[test]
    fn test_record_row_prefers_title_then_name() {
        let row = RecordRow::from(&json!({"id": 3, "login": "john", "firstname": "John"}));
        assert_eq!(row.id, "3");
        assert_eq!(row.label, "john");

        let row = RecordRow::from(&json!({"id": 1, "title": null, "name": "Users"}));
        assert_eq!(row.label, "Users");
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(Payload::Raw(Vec::new()).pretty_print(), "(empty response)");
    }
}
