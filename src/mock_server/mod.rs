//! Mock Zammad API server for E2E testing.
//!
//! An in-memory server that behaves like a Zammad instance for integration
//! and end-to-end tests. Unlike wiremock, which mocks one exchange per
//! expectation, this server keeps records across requests, so create, list,
//! search and delete can be exercised as a workflow. Every request is
//! recorded for later inspection.
//!
//! # Example
//!
//! ```ignore
//! use zammad::mock_server::MockServer;
//! use zammad::ZammadClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = ZammadClient::builder(server.url())
//!         .http_token("test-token")
//!         .build()
//!         .unwrap();
//!
//!     // Server comes with default fixtures
//!     let me = client.user().me().await.unwrap();
//!     assert_eq!(me.get("firstname").unwrap(), "John");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{paginate, MockState, RecordedRequest};
