//! Zammad API client library.
//!
//! A Rust library for the Zammad helpdesk REST API. Every remote collection
//! (tickets, users, groups, knowledge base entities, ...) is reached through a
//! [`Resource`] offering the same verbs, and listing calls return a
//! [`Pagination`] cursor that fetches adjacent pages by replaying the
//! original request.
//!
//! # Quick Start
//!
//! ```no_run
//! use zammad::{Filters, ZammadClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> zammad::Result<()> {
//!     // Create client from environment variables
//!     let client = ZammadClient::from_env()?;
//!
//!     // Who am I?
//!     let me = client.user().me().await?;
//!     println!("Logged in as {:?}", me.get("login"));
//!
//!     // Walk all open tickets, 50 per page
//!     let tickets = client.ticket();
//!     let filters = Filters::new().with("per_page", 50);
//!     let mut page = tickets.search("state.name:open", 1, Some(&filters)).await?;
//!     loop {
//!         for ticket in &page {
//!             println!("#{} {}", ticket["number"], ticket["title"]);
//!         }
//!         if page.is_last_page() {
//!             break;
//!         }
//!         page = page.next_page().await?;
//!     }
//!
//!     // Create a group
//!     let group = client.group().create(&json!({"name": "Support"})).await?;
//!     println!("Created {:?}", group.get("id"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`ZammadClient`] - authenticated transport with persistent headers
//! - [`Resource`] - `all`, `search`, `find`, `create`, `update`, `destroy`
//!   for one [`ResourceKind`]; verbs a kind does not offer fail with
//!   [`ZammadError::Unsupported`] without touching the network
//! - [`Pagination`] - one page of records plus `next_page`/`prev_page`
//! - [`Payload`] - a response body, JSON when it parses, raw bytes otherwise
//!
//! # Configuration
//!
//! [`ZammadClient::from_env`] reads:
//!
//! - `ZAMMAD_URL` (required) - API root, e.g. `https://helpdesk.example.com/api/v1`
//! - `ZAMMAD_HTTP_TOKEN`, `ZAMMAD_OAUTH2_TOKEN`, or
//!   `ZAMMAD_USERNAME` + `ZAMMAD_PASSWORD` - credentials, first match wins
//! - `ZAMMAD_ON_BEHALF_OF` (optional) - initial `X-On-Behalf-Of` value

mod auth;
mod client;
mod error;
mod filters;
mod models;
mod pagination;
mod payload;
mod resource;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::Auth;
pub use client::{OnBehalfOf, ZammadClient, ZammadClientBuilder, ON_BEHALF_OF_HEADER};
pub use error::{Result, ZammadError};
pub use filters::Filters;
pub use pagination::{ListVerb, Pagination};
pub use payload::Payload;

// Re-export resources
pub use resource::{
    KnowledgeBaseAnswers, KnowledgeBaseCategories, KnowledgeBases, Links, Nesting,
    ObjectAttributes, OnlineNotifications, Resource, ResourceKind, Tags,
    TicketArticleAttachments, Tickets, Users, Verb, DEFAULT_PER_PAGE, KNOWLEDGE_BASE_ID,
};

// Re-export models
pub use models::{
    AnswerPublicity, KnowledgeBaseSettings, LinkRequest, LinkType, UserRecord, USER_NOEXPORT,
};
