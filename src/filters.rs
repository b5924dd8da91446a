//! Caller-supplied filters for listing and search requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the page number.
pub const PAGE: &str = "page";
/// Key holding the page size.
pub const PER_PAGE: &str = "per_page";
/// Key asking Zammad to expand associations into full records.
pub const EXPAND: &str = "expand";
/// Key holding the search string.
pub const QUERY: &str = "query";

/// Mapping of query parameters passed through to the API.
///
/// Values may be scalars, arrays, or nested mappings. Nested values are
/// flattened the way Rails parses them: `{"a": {"b": 1}}` becomes `a[b]=1`
/// and `{"ids": [1, 2]}` becomes `ids[]=1&ids[]=2`.
///
/// # Example
///
/// ```
/// use zammad::Filters;
///
/// let filters = Filters::new()
///     .with("per_page", 2)
///     .with("sort_by", "created_at");
/// assert_eq!(filters.per_page(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(Map<String, Value>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The `per_page` value, if present and a positive integer.
    ///
    /// Accepts both numbers and numeric strings.
    pub fn per_page(&self) -> Option<u32> {
        match self.0.get(PER_PAGE)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|n| *n > 0)
    }

    /// Insert `value` under `key` unless the caller already set it.
    pub(crate) fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.0.contains_key(key) {
            self.0.insert(key.to_string(), value.into());
        }
    }

    /// Copy without any page number.
    ///
    /// Removes `page` at the top level and inside a nested `filters`
    /// mapping, so a captured filter set can never override the page a
    /// cursor navigates to.
    pub(crate) fn without_page(&self) -> Self {
        let mut copy = self.clone();
        copy.0.remove(PAGE);
        if let Some(Value::Object(nested)) = copy.0.get_mut("filters") {
            nested.remove(PAGE);
        }
        copy
    }

    /// Flatten into `(key, value)` query pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            flatten(key.clone(), value, &mut pairs);
        }
        pairs
    }
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (inner, v) in map {
                flatten(format!("{key}[{inner}]"), v, out);
            }
        }
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                flatten(key.clone(), item, out);
            }
        }
        Value::Null => out.push((key, String::new())),
        Value::String(s) => out.push((key, s.clone())),
        Value::Bool(b) => out.push((key, b.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
    }
}

impl From<Map<String, Value>> for Filters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
