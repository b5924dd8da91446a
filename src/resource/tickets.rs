//! Ticket-specific endpoints.

use std::fmt::{Debug, Display};

use super::{encode_segment, resource_wrapper, ResourceKind};
use crate::error::Result;
use crate::payload::Payload;

resource_wrapper! {
    /// The `tickets` resource plus article listing and merging.
    Tickets => ResourceKind::Ticket
}

impl Tickets {
    /// All articles of ticket `id`, expanded.
    #[tracing::instrument(skip(self))]
    pub async fn articles(&self, id: impl Display + Debug) -> Result<Payload> {
        let path = format!("ticket_articles/by_ticket/{}", encode_segment(id));
        self.client().get_with_query(&path, &[("expand", "true")]).await
    }

    /// Merge ticket `id` into the ticket numbered `number`.
    ///
    /// Zammad only allows this for password-authenticated sessions and
    /// answers "Object already exists!" when the tickets are already merged.
    #[tracing::instrument(skip(self))]
    pub async fn merge(
        &self,
        id: impl Display + Debug,
        number: impl Display + Debug,
    ) -> Result<Payload> {
        let path = format!(
            "ticket_merge/{}/{}",
            encode_segment(id),
            encode_segment(number)
        );
        self.client().put_empty(&path).await
    }
}
