//! Change-tracking user record.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

/// Attributes the server derives itself; never sent back.
pub const USER_NOEXPORT: [&str; 6] = [
    "role_ids",
    "organization_id",
    "organization_ids",
    "authorization_ids",
    "karma_user_ids",
    "group_ids",
];

/// A user held locally and synced with [`crate::Users::save`],
/// [`crate::Users::update_changed`] and [`crate::Users::delete`].
///
/// Every [`UserRecord::set`] that changes a value marks the attribute as
/// changed; `update_changed` sends only those attributes. A successful
/// save or update replaces the attributes with the server's answer and
/// clears the change set.
///
/// ```
/// use zammad::UserRecord;
///
/// let mut user = UserRecord::new("jdoe", "John", "Doe", "john@example.com");
/// user.set("firstname", "Johnny");
/// assert!(user.is_changed("firstname"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserRecord {
    attributes: Map<String, Value>,
    #[serde(skip)]
    changed: BTreeSet<String>,
}

impl UserRecord {
    /// A new, unsaved user with the four attributes Zammad requires.
    pub fn new(
        login: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let mut attributes = Map::new();
        attributes.insert("login".to_string(), Value::String(login.into()));
        attributes.insert("firstname".to_string(), Value::String(firstname.into()));
        attributes.insert("lastname".to_string(), Value::String(lastname.into()));
        attributes.insert("email".to_string(), Value::String(email.into()));
        Self::from_attributes(attributes)
    }

    /// Wrap attributes as returned by the server. Nothing is marked changed.
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            changed: BTreeSet::new(),
        }
    }

    /// Server-assigned id, once the user exists remotely.
    pub fn id(&self) -> Option<u64> {
        self.attributes.get("id").and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Set an attribute, marking it changed when the value differs.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if self.attributes.get(&key) != Some(&value) {
            self.changed.insert(key.clone());
        }
        self.attributes.insert(key, value);
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    /// Names of the attributes changed since the last sync.
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    /// Every attribute except the server-derived ones.
    pub fn exported(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(key, _)| !is_noexport(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Changed attributes except the server-derived ones.
    pub fn changes(&self) -> Map<String, Value> {
        self.changed
            .iter()
            .filter(|key| !is_noexport(key))
            .filter_map(|key| Some((key.clone(), self.attributes.get(key)?.clone())))
            .collect()
    }

    /// Take the server's view and forget pending changes.
    pub(crate) fn sync(&mut self, attributes: Map<String, Value>) {
        self.attributes.extend(attributes);
        self.changed.clear();
    }
}

fn is_noexport(key: &str) -> bool {
    USER_NOEXPORT.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> UserRecord {
        let attributes = json!({
            "id": 3,
            "login": "john",
            "firstname": "John",
            "role_ids": [1, 2],
            "organization_id": 1
        });
        UserRecord::from_attributes(attributes.as_object().cloned().unwrap())
    }

    #[test]
    fn test_new_record_has_required_attributes() {
        let user = UserRecord::new("jdoe", "John", "Doe", "john@example.com");
        assert_eq!(user.id(), None);
        assert_eq!(user.exported().len(), 4);
        assert_eq!(user.changed().count(), 0);
    }

    #[test]
    fn test_set_marks_only_real_changes() {
        let mut user = stored();
        user.set("firstname", "John");
        assert!(!user.is_changed("firstname"));

        user.set("firstname", "Johnny");
        user.set("note", "vip");
        assert_eq!(user.changed().collect::<Vec<_>>(), vec!["firstname", "note"]);
    }

    #[test]
    fn test_changes_skip_server_derived_attributes() {
        let mut user = stored();
        user.set("role_ids", json!([1]));
        user.set("lastname", "Doe");

        assert_eq!(user.changes(), json!({"lastname": "Doe"}).as_object().cloned().unwrap());
        assert!(!user.exported().contains_key("role_ids"));
        assert!(!user.exported().contains_key("organization_id"));
        assert!(user.exported().contains_key("id"));
    }

    #[test]
    fn test_sync_clears_changes() {
        let mut user = stored();
        user.set("firstname", "Johnny");
        let answer = json!({"updated_at": "2024-03-01T10:15:00.000Z"});
        user.sync(answer.as_object().cloned().unwrap());

        assert_eq!(user.changed().count(), 0);
        assert_eq!(user.get("firstname"), Some(&json!("Johnny")));
        assert!(user.get("updated_at").is_some());
    }
}
