//! Normalized response bodies.
//!
//! Every successful call yields a [`Payload`]: the body decoded as JSON when
//! it parses, otherwise the raw bytes. Zammad answers some deletes with an
//! empty body, which lands in [`Payload::Raw`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ZammadError};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Body parsed as JSON.
    Json(Value),
    /// Body that is not JSON (including the empty body).
    Raw(Vec<u8>),
}

impl Payload {
    /// Decode a body, falling back to raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(bytes.to_vec()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            Self::Json(_) => None,
        }
    }

    /// Look up a key of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|v| v.get(key))
    }

    /// True for an empty raw body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Raw(bytes) if bytes.is_empty())
    }

    /// Deserialize a JSON body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::UnexpectedPayload`] for raw bodies and
    /// [`ZammadError::ParseError`] when the JSON does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Raw(bytes) => Err(ZammadError::UnexpectedPayload(format!(
                "expected JSON, got {} raw bytes",
                bytes.len()
            ))),
        }
    }

    /// Split a listing body into its items.
    ///
    /// An empty body or `null` is an empty page.
    pub(crate) fn into_items(self) -> Result<Vec<Value>> {
        match self {
            Self::Json(Value::Array(items)) => Ok(items),
            Self::Json(Value::Null) => Ok(Vec::new()),
            Self::Raw(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Self::Json(other) => Err(ZammadError::UnexpectedPayload(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            ))),
            Self::Raw(bytes) => Err(ZammadError::UnexpectedPayload(format!(
                "expected a JSON array of records, got {} raw bytes",
                bytes.len()
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
