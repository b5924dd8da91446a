//! Resources with a single extra endpoint.

use std::fmt::{Debug, Display};

use serde_json::{Map, Value};

use super::{encode_segment, resource_wrapper, ResourceKind};
use crate::error::{Result, ZammadError};
use crate::models::UserRecord;
use crate::payload::Payload;

resource_wrapper! {
    /// The `users` resource.
    Users => ResourceKind::User
}

impl Users {
    /// The authenticated user (or the user acted on behalf of).
    #[tracing::instrument(skip(self))]
    pub async fn me(&self) -> Result<Payload> {
        self.client().get(&format!("{}/me", self.path())).await
    }

    /// Create `user` remotely from all its exportable attributes, then
    /// take the server's answer (including the new id).
    #[tracing::instrument(skip(self, user))]
    pub async fn save(&self, user: &mut UserRecord) -> Result<()> {
        let created = self.create(&user.exported()).await?;
        user.sync(answer_object("save", created)?);
        Ok(())
    }

    /// Send only the attributes changed since the last sync.
    ///
    /// On failure the change set is kept so the update can be retried.
    #[tracing::instrument(skip(self, user), fields(id = user.id()))]
    pub async fn update_changed(&self, user: &mut UserRecord) -> Result<()> {
        let id = user.id().ok_or(ZammadError::MissingParameter {
            operation: "update",
            parameter: "id",
        })?;
        let updated = self.update(id, &user.changes()).await?;
        user.sync(answer_object("update", updated)?);
        Ok(())
    }

    /// Destroy `user` by its id.
    #[tracing::instrument(skip(self, user), fields(id = user.id()))]
    pub async fn delete(&self, user: &UserRecord) -> Result<Payload> {
        let id = user.id().ok_or(ZammadError::MissingParameter {
            operation: "delete",
            parameter: "id",
        })?;
        self.destroy(id).await
    }
}

fn answer_object(operation: &str, payload: Payload) -> Result<Map<String, Value>> {
    match payload.into_json() {
        Some(Value::Object(map)) => Ok(map),
        _ => Err(ZammadError::UnexpectedPayload(format!(
            "{operation} expected a user object"
        ))),
    }
}

resource_wrapper! {
    OnlineNotifications => ResourceKind::OnlineNotification
}

impl OnlineNotifications {
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_read(&self) -> Result<Payload> {
        let path = format!("{}/mark_all_as_read", self.path());
        self.client().post_empty(&path).await
    }
}

resource_wrapper! {
    /// Object manager attributes (custom fields).
    ObjectAttributes => ResourceKind::ObjectAttribute
}

impl ObjectAttributes {
    /// Apply pending attribute changes to the database schema.
    #[tracing::instrument(skip(self))]
    pub async fn execute_migrations(&self) -> Result<Payload> {
        self.client()
            .post_empty("object_manager_attributes_execute_migrations")
            .await
    }
}

resource_wrapper! {
    TicketArticleAttachments => ResourceKind::TicketArticleAttachment
}

impl TicketArticleAttachments {
    /// Download attachment `id` of an article. Usually a raw payload.
    #[tracing::instrument(skip(self))]
    pub async fn download(
        &self,
        id: impl Display + Debug,
        article_id: impl Display + Debug,
        ticket_id: impl Display + Debug,
    ) -> Result<Payload> {
        let path = format!(
            "{}/{}/{}/{}",
            self.path(),
            encode_segment(ticket_id),
            encode_segment(article_id),
            encode_segment(id)
        );
        self.client().get(&path).await
    }
}
