//! Ticket links.

use super::{resource_wrapper, ResourceKind};
use crate::error::Result;
use crate::models::LinkRequest;
use crate::payload::Payload;

resource_wrapper! {
    /// The `links` resource.
    Links => ResourceKind::Link
}

impl Links {
    #[tracing::instrument(skip(self))]
    pub async fn add(&self, request: &LinkRequest) -> Result<Payload> {
        let path = format!("{}/add", self.path());
        self.client().post(&path, request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, request: &LinkRequest) -> Result<Payload> {
        let path = format!("{}/remove", self.path());
        self.client().delete_with_body(&path, request).await
    }

    /// Links of the ticket with id `ticket_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, ticket_id: u64) -> Result<Payload> {
        let id = ticket_id.to_string();
        let query = [("link_object", "Ticket"), ("link_object_value", id.as_str())];
        self.client().get_with_query(self.path(), &query).await
    }
}
