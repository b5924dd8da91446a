//! Error types for Zammad API operations.

use thiserror::Error;

use crate::resource::Verb;

/// Errors that can occur during Zammad API operations.
#[derive(Debug, Error)]
pub enum ZammadError {
    /// Configuration is missing or contradictory.
    #[error("Zammad configuration error: {0}")]
    Config(String),

    /// The server answered with a failure status.
    ///
    /// `body` is the raw response body, unmodified.
    #[error("Zammad API error (HTTP {status_code}): {body}")]
    Api { status_code: u16, body: String },

    /// The operation is intentionally not offered by this resource.
    #[error("The method '{operation}' is not available for the {resource} resource.")]
    Unsupported {
        resource: &'static str,
        operation: Verb,
    },

    /// A payload had the wrong JSON shape.
    #[error("Invalid payload for '{operation}': expected {expected}")]
    InvalidType {
        operation: &'static str,
        expected: &'static str,
    },

    /// A payload lacks a key the operation needs to build its path.
    #[error("Missing parameter '{parameter}' for '{operation}'")]
    MissingParameter {
        operation: &'static str,
        parameter: &'static str,
    },

    /// A response body did not have the shape the operation expects.
    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),

    /// A request path would leave its resource through a `.` or `..`
    /// segment.
    #[error("Invalid request path '{0}': '.' and '..' segments are not allowed")]
    InvalidPath(String),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl ZammadError {
    /// HTTP status of an [`ZammadError::Api`] error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Result type alias for Zammad operations.
pub type Result<T> = core::result::Result<T, ZammadError>;
