//! Tags attached to objects.
//!
//! Tags have no collection endpoints of their own, so every generic verb is
//! disabled; use the object-scoped operations below.

use serde::Serialize;

use super::{resource_wrapper, ResourceKind};
use crate::error::Result;
use crate::payload::Payload;

resource_wrapper! {
    /// The `tags` endpoints.
    Tags => ResourceKind::Tag
}

#[derive(Debug, Serialize)]
struct TagChange<'a> {
    object: &'a str,
    o_id: u64,
    item: &'a str,
}

impl Tags {
    /// Tags of `object` (e.g. `Ticket`) with id `o_id`.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, object: &str, o_id: u64) -> Result<Payload> {
        let o_id = o_id.to_string();
        let query = [("object", object), ("o_id", o_id.as_str())];
        self.client().get_with_query(self.path(), &query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add(&self, object: &str, o_id: u64, item: &str) -> Result<Payload> {
        let path = format!("{}/add", self.path());
        let body = TagChange { object, o_id, item };
        self.client().post(&path, &body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, object: &str, o_id: u64, item: &str) -> Result<Payload> {
        let path = format!("{}/remove", self.path());
        let body = TagChange { object, o_id, item };
        self.client().delete_with_body(&path, &body).await
    }
}
