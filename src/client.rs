//! Zammad API client.
//!
//! Low-level HTTP client that handles authentication, persistent headers and
//! raw requests. Resource operations live in [`crate::resource`].

use std::env;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::auth::Auth;
use crate::error::{Result, ZammadError};
use crate::payload::Payload;

const USER_AGENT: &str = concat!("zammad-rs/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Header naming the user a request acts on behalf of.
pub const ON_BEHALF_OF_HEADER: &str = "X-On-Behalf-Of";

/// Low-level Zammad API client.
///
/// Cheaply cloneable; clones share the connection pool and the
/// `X-On-Behalf-Of` value.
///
/// # Example
///
/// ```no_run
/// use zammad::ZammadClient;
///
/// # fn example() -> zammad::Result<()> {
/// // Create from environment variables
/// let client = ZammadClient::from_env()?;
///
/// // Or configure manually
/// let client = ZammadClient::builder("https://helpdesk.example.com/api/v1")
///     .http_token("your-token")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZammadClient {
    http: Client,
    base_url: Arc<Url>,
    auth: Arc<Auth>,
    on_behalf_of: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ZammadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZammadClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .field("on_behalf_of", &self.on_behalf_of())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ZammadClient`].
#[derive(Debug, Clone)]
pub struct ZammadClientBuilder {
    url: String,
    username: Option<String>,
    password: Option<String>,
    http_token: Option<String>,
    oauth2_token: Option<String>,
    on_behalf_of: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl ZammadClientBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            http_token: None,
            oauth2_token: None,
            on_behalf_of: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Authenticate with username and password.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Authenticate with a Zammad access token.
    #[must_use]
    pub fn http_token(mut self, token: impl Into<String>) -> Self {
        self.http_token = Some(token.into());
        self
    }

    /// Authenticate with an OAuth2 bearer token.
    #[must_use]
    pub fn oauth2_token(mut self, token: impl Into<String>) -> Self {
        self.oauth2_token = Some(token.into());
        self
    }

    /// Initial `X-On-Behalf-Of` value (user id, login or email).
    #[must_use]
    pub fn on_behalf_of(mut self, user: impl Into<String>) -> Self {
        self.on_behalf_of = Some(user.into());
        self
    }

    /// Extra header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Transport timeout for each request (default 60 seconds).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::Config`] when the URL is empty or no
    /// authentication mode is fully specified, and
    /// [`ZammadError::InvalidHeader`] for unusable extra headers.
    pub fn build(self) -> Result<ZammadClient> {
        if self.url.trim().is_empty() {
            return Err(ZammadError::Config("Missing url in config".to_string()));
        }
        let auth = Auth::resolve(
            self.http_token,
            self.oauth2_token,
            self.username,
            self.password,
        )?;

        let base_url = Url::parse(&normalize_base_url(&self.url))?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ZammadError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ZammadError::InvalidHeader(format!("{name}: {e}")))?;
            default_headers.insert(name, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(self.timeout)
            .build()
            .map_err(ZammadError::HttpError)?;

        tracing::debug!(base_url = %base_url, "built Zammad client");

        Ok(ZammadClient {
            http,
            base_url: Arc::new(base_url),
            auth: Arc::new(auth),
            on_behalf_of: Arc::new(RwLock::new(self.on_behalf_of)),
        })
    }
}

/// `.` or `..`, in any of the spellings URL parsing resolves as such.
fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | "%2e" | ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

/// Ensure the base URL ends with `/` so relative joins append to it.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

impl ZammadClient {
    /// Start configuring a client for the API rooted at `url`.
    pub fn builder(url: impl Into<String>) -> ZammadClientBuilder {
        ZammadClientBuilder::new(url)
    }

    /// Create a client from environment variables.
    ///
    /// Reads `ZAMMAD_URL` plus one of `ZAMMAD_HTTP_TOKEN`,
    /// `ZAMMAD_OAUTH2_TOKEN` or `ZAMMAD_USERNAME`/`ZAMMAD_PASSWORD`, and
    /// optionally `ZAMMAD_ON_BEHALF_OF`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or credentials are missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("ZAMMAD_URL").ok_or_else(|| {
            ZammadError::Config("ZAMMAD_URL environment variable not set".to_string())
        })?;

        let mut builder = Self::builder(url);
        builder.http_token = lookup("ZAMMAD_HTTP_TOKEN");
        builder.oauth2_token = lookup("ZAMMAD_OAUTH2_TOKEN");
        builder.username = lookup("ZAMMAD_USERNAME");
        builder.password = lookup("ZAMMAD_PASSWORD");
        builder.on_behalf_of = lookup("ZAMMAD_ON_BEHALF_OF").filter(|v| !v.is_empty());
        builder.build()
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The current `X-On-Behalf-Of` value.
    pub fn on_behalf_of(&self) -> Option<String> {
        self.on_behalf_of
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persistently set the `X-On-Behalf-Of` value.
    pub fn set_on_behalf_of(&self, user: impl Into<String>) {
        self.replace_on_behalf_of(Some(user.into()));
    }

    /// Stop sending `X-On-Behalf-Of`.
    pub fn clear_on_behalf_of(&self) {
        self.replace_on_behalf_of(None);
    }

    fn replace_on_behalf_of(&self, value: Option<String>) -> Option<String> {
        let mut slot = self
            .on_behalf_of
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, value)
    }

    /// Act on behalf of `user` until the returned guard is dropped.
    ///
    /// The previous value is restored when the guard goes out of scope,
    /// whether the scope ends normally, through `?`, or by panicking.
    ///
    /// ```no_run
    /// # async fn example(client: &zammad::ZammadClient) -> zammad::Result<()> {
    /// {
    ///     let as_customer = client.request_on_behalf_of("nicole.braun@zammad.org");
    ///     as_customer.ticket().find(1).await?;
    /// }
    /// // back to the previous identity here
    /// # Ok(())
    /// # }
    /// ```
    pub fn request_on_behalf_of(&self, user: impl Into<String>) -> OnBehalfOf<'_> {
        let previous = self.replace_on_behalf_of(Some(user.into()));
        OnBehalfOf {
            client: self,
            previous,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if path.split('/').any(is_dot_segment) {
            return Err(ZammadError::InvalidPath(path.to_string()));
        }
        let url = self.base_url.join(path)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.auth.apply(self.http.request(method, url));
        if let Some(user) = self.on_behalf_of() {
            request = request.header(ON_BEHALF_OF_HEADER, user);
        }
        Ok(request)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Payload> {
        self.send(self.request(Method::GET, path)?).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Payload> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    /// Make a POST request without a body.
    #[tracing::instrument(skip(self))]
    pub async fn post_empty(&self, path: &str) -> Result<Payload> {
        self.send(self.request(Method::POST, path)?).await
    }

    /// Make a multipart POST request.
    #[tracing::instrument(skip(self, form))]
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Payload> {
        self.send(self.request(Method::POST, path)?.multipart(form)).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    /// Make a PUT request without a body.
    #[tracing::instrument(skip(self))]
    pub async fn put_empty(&self, path: &str) -> Result<Payload> {
        self.send(self.request(Method::PUT, path)?).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload> {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Payload> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// Make a DELETE request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Payload> {
        self.send(self.request(Method::DELETE, path)?.json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Payload> {
        let response = request.send().await.map_err(ZammadError::HttpError)?;
        Self::read_payload(response).await
    }

    /// Check the status, then decode the body.
    async fn read_payload(response: Response) -> Result<Payload> {
        let status = response.status();
        let body = response.bytes().await.map_err(ZammadError::HttpError)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(ZammadError::Api {
                status_code: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Payload::from_bytes(&body))
    }
}

/// Scoped `X-On-Behalf-Of` override returned by
/// [`ZammadClient::request_on_behalf_of`].
///
/// Dereferences to the client, so requests can be issued through it.
#[must_use = "the override ends as soon as the guard is dropped"]
pub struct OnBehalfOf<'a> {
    client: &'a ZammadClient,
    previous: Option<String>,
}

impl Deref for OnBehalfOf<'_> {
    type Target = ZammadClient;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl Drop for OnBehalfOf<'_> {
    fn drop(&mut self) {
        self.client.replace_on_behalf_of(self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> ZammadClient {
        ZammadClient::builder("https://zammad.example.com")
            .basic_auth("test", "test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_debug() {
        let client = ZammadClient::builder("https://zammad.example.com")
            .http_token("test-token")
            .build()
            .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("ZammadClient"));
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let url = "https://zammad.example.com";
        let client1 = ZammadClient::builder(format!("{url}/"))
            .basic_auth("test", "test")
            .build()
            .unwrap();
        let client2 = ZammadClient::builder(url)
            .basic_auth("test", "test")
            .build()
            .unwrap();
        assert_eq!(client1.url(), "https://zammad.example.com/");
        assert_eq!(client1.url(), client2.url());
    }

    #[test]
    fn test_base_url_with_path_keeps_path() {
        let client = ZammadClient::builder("https://zammad.example.com/api/v1")
            .http_token("t")
            .build()
            .unwrap();
        assert_eq!(client.url(), "https://zammad.example.com/api/v1/");
        assert_eq!(
            client.base_url().join("tickets/1").unwrap().as_str(),
            "https://zammad.example.com/api/v1/tickets/1"
        );
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let err = ZammadClient::builder("")
            .http_token("t")
            .build()
            .unwrap_err();
        assert!(matches!(err, ZammadError::Config(ref m) if m.contains("url")));
    }

    #[test]
    fn test_missing_credentials_are_rejected() {
        let err = ZammadClient::builder("https://zammad.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ZammadError::Config(_)));
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let err = ZammadClient::builder("https://zammad.example.com")
            .http_token("t")
            .header("bad header", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, ZammadError::InvalidHeader(_)));
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        let client = client();
        for path in ["users/..", "users/.", "users/%2E%2E", "tickets/.%2e/1", ".."] {
            let err = client.request(Method::GET, path).unwrap_err();
            assert!(matches!(err, ZammadError::InvalidPath(_)), "{path}");
        }
        assert!(client.request(Method::GET, "users/..x").is_ok());
        assert!(client.request(Method::GET, "users/a.b").is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ZAMMAD_URL", "https://zammad.example.com/api/v1"),
            ("ZAMMAD_OAUTH2_TOKEN", "oauth"),
            ("ZAMMAD_ON_BEHALF_OF", "agent@example.com"),
        ]
        .into_iter()
        .collect();

        let client =
            ZammadClient::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(client.auth(), &Auth::OAuth2("oauth".to_string()));
        assert_eq!(client.on_behalf_of().as_deref(), Some("agent@example.com"));
    }

    #[test]
    fn test_from_lookup_requires_url() {
        let err = ZammadClient::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("ZAMMAD_URL"));
    }

    #[test]
    fn test_on_behalf_of_scope_restores_previous_value() {
        let client = client();
        client.set_on_behalf_of("USERX");
        {
            let api = client.request_on_behalf_of("USERXX");
            assert_eq!(api.on_behalf_of().as_deref(), Some("USERXX"));
        }
        assert_eq!(client.on_behalf_of().as_deref(), Some("USERX"));
    }

    #[test]
    fn test_on_behalf_of_scope_restores_unset() {
        let client = client();
        {
            let _api = client.request_on_behalf_of("someone");
            assert_eq!(client.on_behalf_of().as_deref(), Some("someone"));
        }
        assert_eq!(client.on_behalf_of(), None);
    }

    #[test]
    fn test_on_behalf_of_scope_restores_on_error_path() {
        fn scoped(client: &ZammadClient) -> Result<()> {
            let _api = client.request_on_behalf_of("B");
            let failed: Result<()> = Err(ZammadError::Config("boom".to_string()));
            failed?;
            Ok(())
        }

        let client = client();
        client.set_on_behalf_of("A");
        assert!(scoped(&client).is_err());
        assert_eq!(client.on_behalf_of().as_deref(), Some("A"));
    }

    #[test]
    fn test_on_behalf_of_scope_restores_on_panic() {
        let client = client();
        client.set_on_behalf_of("A");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _api = client.request_on_behalf_of("B");
            panic!("scope body failed");
        }));

        assert!(result.is_err());
        assert_eq!(client.on_behalf_of().as_deref(), Some("A"));
    }

    #[test]
    fn test_clones_share_on_behalf_of() {
        let client = client();
        let clone = client.clone();
        clone.set_on_behalf_of("shared");
        assert_eq!(client.on_behalf_of().as_deref(), Some("shared"));
        client.clear_on_behalf_of();
        assert_eq!(clone.on_behalf_of(), None);
    }
}
