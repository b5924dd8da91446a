//! Authentication modes.

use reqwest::RequestBuilder;

use crate::error::{Result, ZammadError};

/// The single authentication mode a client uses.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Zammad access token, sent as `Authorization: Token token=<token>`.
    HttpToken(String),
    /// OAuth2 access token, sent as a bearer token.
    OAuth2(String),
    /// HTTP basic auth.
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpToken(_) => f.write_str("Auth::HttpToken(..)"),
            Self::OAuth2(_) => f.write_str("Auth::OAuth2(..)"),
            Self::Basic { username, .. } => f
                .debug_struct("Auth::Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

impl Auth {
    /// Pick the active mode from whatever credentials were configured.
    ///
    /// An HTTP token wins over an OAuth2 token, which wins over basic auth.
    /// Empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::Config`] when no mode is fully specified.
    pub fn resolve(
        http_token: Option<String>,
        oauth2_token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        if let Some(token) = present(http_token) {
            return Ok(Self::HttpToken(token));
        }
        if let Some(token) = present(oauth2_token) {
            return Ok(Self::OAuth2(token));
        }
        match (present(username), present(password)) {
            (Some(username), Some(password)) => Ok(Self::Basic { username, password }),
            (None, _) => Err(ZammadError::Config("Missing username in config".to_string())),
            (Some(_), None) => Err(ZammadError::Config("Missing password in config".to_string())),
        }
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::HttpToken(token) => {
                request.header(reqwest::header::AUTHORIZATION, format!("Token token={token}"))
            }
            Self::OAuth2(token) => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_http_token_takes_precedence() {
        let auth = Auth::resolve(s("tok"), s("oauth"), s("user"), s("pw")).unwrap();
        assert_eq!(auth, Auth::HttpToken("tok".to_string()));
    }

    #[test]
    fn test_oauth2_before_basic() {
        let auth = Auth::resolve(None, s("oauth"), s("user"), s("pw")).unwrap();
        assert_eq!(auth, Auth::OAuth2("oauth".to_string()));
    }

    #[test]
    fn test_basic_needs_both_parts() {
        let err = Auth::resolve(None, None, s("user"), None).unwrap_err();
        assert!(err.to_string().contains("Missing password"));

        let err = Auth::resolve(None, None, None, s("pw")).unwrap_err();
        assert!(err.to_string().contains("Missing username"));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let err = Auth::resolve(s(""), s(""), s(""), s("")).unwrap_err();
        assert!(matches!(err, ZammadError::Config(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!(
            "{:?}",
            Auth::Basic {
                username: "agent".to_string(),
                password: "hunter2".to_string()
            }
        );
        assert!(debug.contains("agent"));
        assert!(!debug.contains("hunter2"));
        assert!(!format!("{:?}", Auth::HttpToken("secret".into())).contains("secret"));
    }
}
