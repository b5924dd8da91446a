//! Knowledge base endpoints.
//!
//! Knowledge bases, their answers and their categories have no flat
//! collection endpoints. Everything is addressed below a knowledge base id:
//! `knowledge_bases/<kb>/answers/<id>`, `knowledge_bases/<kb>/categories/<id>`.

use std::fmt::{Debug, Display};

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use super::{encode_segment, require_object, resource_wrapper, ResourceKind};
use crate::error::Result;
use crate::models::{AnswerPublicity, KnowledgeBaseSettings};
use crate::payload::Payload;

resource_wrapper! {
    /// Knowledge base management. None of the generic verbs are available.
    KnowledgeBases => ResourceKind::KnowledgeBase
}

impl KnowledgeBases {
    fn kb_path(&self, kb: impl Display) -> String {
        format!("{}/{}", self.path(), encode_segment(kb))
    }

    /// Load the whole knowledge base structure (bases, locales, categories).
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) -> Result<Payload> {
        self.client()
            .post_empty(&format!("{}/init", self.path()))
            .await
    }

    /// Change the settings of knowledge base `id`; unset fields are kept.
    #[tracing::instrument(skip(self))]
    pub async fn manage(
        &self,
        id: impl Display + Debug,
        settings: &KnowledgeBaseSettings,
    ) -> Result<Payload> {
        let path = format!("{}/manage/{}", self.path(), encode_segment(id));
        self.client().patch(&path, settings).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn show_permissions(&self, id: impl Display + Debug) -> Result<Payload> {
        self.client()
            .get(&format!("{}/permissions", self.kb_path(id)))
            .await
    }

    /// Replace the role permissions, e.g.
    /// `{"permissions_dialog": {"permissions": {"1": "editor"}}}`.
    #[tracing::instrument(skip(self, params))]
    pub async fn change_permissions<P: Serialize + ?Sized>(
        &self,
        id: impl Display + Debug,
        params: &P,
    ) -> Result<Payload> {
        let body = require_object("change_permissions", params)?;
        self.client()
            .put(&format!("{}/permissions", self.kb_path(id)), &body)
            .await
    }

    /// Reorder the sub categories of `category_id`; `params` holds
    /// `ordered_ids`.
    #[tracing::instrument(skip(self, params))]
    pub async fn reorder_sub_categories<P: Serialize + ?Sized>(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
        params: &P,
    ) -> Result<Payload> {
        let body = require_object("reorder_sub_categories", params)?;
        let path = format!(
            "{}/categories/{}/reorder_categories",
            self.kb_path(kb_id),
            encode_segment(category_id)
        );
        self.client().patch(&path, &body).await
    }

    /// Reorder the top-level categories; `params` holds `ordered_ids`.
    #[tracing::instrument(skip(self, params))]
    pub async fn reorder_root_categories<P: Serialize + ?Sized>(
        &self,
        kb_id: impl Display + Debug,
        params: &P,
    ) -> Result<Payload> {
        let body = require_object("reorder_root_categories", params)?;
        let path = format!("{}/categories/reorder_root_categories", self.kb_path(kb_id));
        self.client().patch(&path, &body).await
    }
}

resource_wrapper! {
    /// Knowledge base answers.
    ///
    /// `create` needs `knowledge_base_id` in the payload; `update` takes the
    /// knowledge base id and needs `answer_id` in the payload.
    KnowledgeBaseAnswers => ResourceKind::KnowledgeBaseAnswer
}

impl KnowledgeBaseAnswers {
    fn answer_path(&self, kb_id: impl Display, answer_id: impl Display) -> String {
        format!(
            "{}/{}/answers/{}",
            self.path(),
            encode_segment(kb_id),
            encode_segment(answer_id)
        )
    }

    /// Fetch an answer with its assets.
    #[tracing::instrument(skip(self))]
    pub async fn find_answer(
        &self,
        kb_id: impl Display + Debug,
        answer_id: impl Display + Debug,
    ) -> Result<Payload> {
        self.client()
            .get_with_query(&self.answer_path(kb_id, answer_id), &[("full", "true")])
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn destroy_answer(
        &self,
        kb_id: impl Display + Debug,
        answer_id: impl Display + Debug,
    ) -> Result<Payload> {
        self.client()
            .delete(&self.answer_path(kb_id, answer_id))
            .await
    }

    /// Move an answer to another publication state.
    #[tracing::instrument(skip(self))]
    pub async fn change_answer_visibility(
        &self,
        kb_id: impl Display + Debug,
        answer_id: impl Display + Debug,
        publicity: AnswerPublicity,
    ) -> Result<Payload> {
        let path = format!("{}/{}", self.answer_path(kb_id, answer_id), publicity);
        self.client().post_empty(&path).await
    }

    /// Upload `content` as an attachment named `file_name`.
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    pub async fn add_attachment(
        &self,
        kb_id: impl Display + Debug,
        answer_id: impl Display + Debug,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Payload> {
        let part = Part::bytes(content).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let path = format!("{}/attachments", self.answer_path(kb_id, answer_id));
        self.client().post_multipart(&path, form).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_attachment(
        &self,
        kb_id: impl Display + Debug,
        answer_id: impl Display + Debug,
        attachment_id: impl Display + Debug,
    ) -> Result<Payload> {
        let path = format!(
            "{}/attachments/{}",
            self.answer_path(kb_id, answer_id),
            encode_segment(attachment_id)
        );
        self.client().delete(&path).await
    }
}

resource_wrapper! {
    /// Knowledge base categories.
    ///
    /// `create` needs `knowledge_base_id` in the payload; `update` takes the
    /// knowledge base id and needs `category_id` in the payload.
    KnowledgeBaseCategories => ResourceKind::KnowledgeBaseCategory
}

impl KnowledgeBaseCategories {
    fn category_path(&self, kb_id: impl Display, category_id: impl Display) -> String {
        format!(
            "{}/{}/categories/{}",
            self.path(),
            encode_segment(kb_id),
            encode_segment(category_id)
        )
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_category(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
    ) -> Result<Payload> {
        self.client()
            .get(&self.category_path(kb_id, category_id))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn destroy_category(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
    ) -> Result<Payload> {
        self.client()
            .delete(&self.category_path(kb_id, category_id))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn show_permissions(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
    ) -> Result<Payload> {
        let path = format!("{}/permissions", self.category_path(kb_id, category_id));
        self.client().get(&path).await
    }

    #[tracing::instrument(skip(self, params))]
    pub async fn change_permissions<P: Serialize + ?Sized>(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
        params: &P,
    ) -> Result<Payload> {
        let body = require_object("change_permissions", params)?;
        let path = format!("{}/permissions", self.category_path(kb_id, category_id));
        self.client().put(&path, &body).await
    }

    /// Reorder the answers of a category; `params` holds `ordered_ids`.
    #[tracing::instrument(skip(self, params))]
    pub async fn reorder_answers<P: Serialize + ?Sized>(
        &self,
        kb_id: impl Display + Debug,
        category_id: impl Display + Debug,
        params: &P,
    ) -> Result<Payload> {
        let body = require_object("reorder_answers", params)?;
        let path = format!("{}/reorder_answers", self.category_path(kb_id, category_id));
        self.client().patch(&path, &body).await
    }
}
