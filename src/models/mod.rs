//! Typed request shapes for the endpoints that need them.
//!
//! Records themselves stay untyped ([`serde_json::Value`]); these types only
//! cover parameters with a fixed vocabulary, plus the change-tracking
//! [`UserRecord`].

mod knowledge_base;
mod link;
mod user;

pub use knowledge_base::{AnswerPublicity, KnowledgeBaseSettings};
pub use link::{LinkRequest, LinkType};
pub use user::{UserRecord, USER_NOEXPORT};
