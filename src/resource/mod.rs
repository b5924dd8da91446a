//! Generic access to Zammad resources.
//!
//! A [`Resource`] binds a client to one [`ResourceKind`] and offers the six
//! generic verbs (`all`, `search`, `find`, `create`, `update`, `destroy`).
//! Listing verbs return a [`Pagination`] that can replay itself for the
//! adjacent pages.
//!
//! Resources with extra endpoints get a thin wrapper type ([`Tickets`],
//! [`Users`], [`KnowledgeBases`], ...) that dereferences to the generic
//! [`Resource`].

mod kind;
mod knowledge_base;
mod links;
mod misc;
mod tags;
mod tickets;

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::ZammadClient;
use crate::error::{Result, ZammadError};
use crate::filters::{self, Filters};
use crate::pagination::{ListVerb, Pagination};
use crate::payload::Payload;

pub use kind::{Nesting, ResourceKind, Verb, KNOWLEDGE_BASE_ID};
pub use knowledge_base::{KnowledgeBaseAnswers, KnowledgeBaseCategories, KnowledgeBases};
pub use links::Links;
pub use misc::{ObjectAttributes, OnlineNotifications, TicketArticleAttachments, Users};
pub use tags::Tags;
pub use tickets::Tickets;

/// Page size used until a caller asks for another one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// A remote collection addressed through the generic verbs.
#[derive(Debug)]
pub struct Resource {
    client: ZammadClient,
    kind: ResourceKind,
    per_page: AtomicU32,
}

impl Resource {
    pub fn new(client: ZammadClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            per_page: AtomicU32::new(DEFAULT_PER_PAGE),
        }
    }

    #[must_use]
    pub fn with_per_page(self, per_page: u32) -> Self {
        self.set_per_page(per_page);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn client(&self) -> &ZammadClient {
        &self.client
    }

    /// Path segment relative to the base URL.
    pub fn path(&self) -> &'static str {
        self.kind.path()
    }

    /// Absolute URL of the collection.
    pub fn url(&self) -> String {
        format!("{}{}", self.client.url(), self.path())
    }

    /// Page size applied when a listing call does not set `per_page`.
    pub fn per_page(&self) -> u32 {
        self.per_page.load(Ordering::Relaxed)
    }

    /// Change the page size. Zero is ignored, like a `per_page` filter of 0.
    pub fn set_per_page(&self, per_page: u32) {
        if per_page == 0 {
            tracing::warn!(resource = self.kind.name(), "ignoring page size of 0");
            return;
        }
        self.per_page.store(per_page, Ordering::Relaxed);
    }

    fn ensure(&self, verb: Verb) -> Result<()> {
        if self.kind.supports(verb) {
            Ok(())
        } else {
            Err(ZammadError::Unsupported {
                resource: self.kind.name(),
                operation: verb,
            })
        }
    }

    pub(crate) fn member_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.path(), encode_segment(id))
    }

    /// Copy the caller's filters and fill in the listing defaults.
    ///
    /// A caller-supplied `per_page` becomes this resource's page size.
    fn listing_filters(&self, page: i64, filters: Option<&Filters>) -> Filters {
        let mut params = filters.cloned().unwrap_or_default();
        if let Some(per_page) = params.per_page() {
            self.set_per_page(per_page);
        }
        params.set_default(filters::PAGE, page);
        params.set_default(filters::PER_PAGE, self.per_page());
        params.set_default(filters::EXPAND, "true");
        params
    }

    /// List one page of the collection.
    ///
    /// `page`, `per_page` and `expand=true` are added unless `filters`
    /// already sets them.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::Unsupported`] for resources without a
    /// collection endpoint, or the transport/API error of the request.
    #[tracing::instrument(skip(self, filters), fields(resource = self.kind.name()))]
    pub async fn all(&self, page: i64, filters: Option<&Filters>) -> Result<Pagination<'_>> {
        self.ensure(Verb::All)?;
        let params = self.listing_filters(page, filters);
        let page = requested_page(&params, page);

        let items = self
            .client
            .get_with_query(self.path(), &params.to_query_pairs())
            .await?
            .into_items()?;

        Ok(Pagination::new(items, self, ListVerb::All, &params, page))
    }

    /// Search the collection.
    ///
    /// Same defaults as [`Resource::all`], plus `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::Unsupported`] for resources without a
    /// search endpoint, or the transport/API error of the request.
    #[tracing::instrument(skip(self, filters), fields(resource = self.kind.name()))]
    pub async fn search(
        &self,
        query: &str,
        page: i64,
        filters: Option<&Filters>,
    ) -> Result<Pagination<'_>> {
        self.ensure(Verb::Search)?;
        let mut params = self.listing_filters(page, filters);
        params.insert(filters::QUERY, query);
        let page = requested_page(&params, page);

        let path = format!("{}/search", self.path());
        let items = self
            .client
            .get_with_query(&path, &params.to_query_pairs())
            .await?
            .into_items()?;

        let verb = ListVerb::Search {
            query: query.to_string(),
        };
        Ok(Pagination::new(items, self, verb, &params, page))
    }

    /// Fetch one record.
    #[tracing::instrument(skip(self), fields(resource = self.kind.name()))]
    pub async fn find(&self, id: impl Display + std::fmt::Debug) -> Result<Payload> {
        self.ensure(Verb::Find)?;
        self.client.get(&self.member_path(id)).await
    }

    /// Create a record from `params`.
    ///
    /// For knowledge-base answers and categories `params` must be a JSON
    /// object holding `knowledge_base_id`, which is moved into the path.
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::InvalidType`] or
    /// [`ZammadError::MissingParameter`] before any request when a nested
    /// resource receives an unusable payload.
    #[tracing::instrument(skip(self, params), fields(resource = self.kind.name()))]
    pub async fn create<P: Serialize + ?Sized>(&self, params: &P) -> Result<Payload> {
        self.ensure(Verb::Create)?;
        match self.kind.nesting() {
            None => self.client.post(self.path(), params).await,
            Some(nesting) => {
                let mut body = require_object("create", params)?;
                let kb = take_id("create", &mut body, KNOWLEDGE_BASE_ID)?;
                let path = format!("{}/{kb}/{}", self.path(), nesting.child);
                self.client.post(&path, &body).await
            }
        }
    }

    /// Update record `id` with `params`.
    ///
    /// For knowledge-base answers and categories `id` is the knowledge base
    /// and `params` must name the child (`answer_id` / `category_id`).
    ///
    /// # Errors
    ///
    /// Returns [`ZammadError::InvalidType`] or
    /// [`ZammadError::MissingParameter`] before any request when a nested
    /// resource receives an unusable payload.
    #[tracing::instrument(skip(self, params), fields(resource = self.kind.name()))]
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        id: impl Display + std::fmt::Debug,
        params: &P,
    ) -> Result<Payload> {
        self.ensure(Verb::Update)?;
        match self.kind.nesting() {
            None => self.client.put(&self.member_path(id), params).await,
            Some(nesting) => {
                let mut body = require_object("update", params)?;
                let child = take_id("update", &mut body, nesting.id_key)?;
                let path = format!(
                    "{}/{}/{}/{child}",
                    self.path(),
                    encode_segment(id),
                    nesting.child
                );
                self.client.patch(&path, &body).await
            }
        }
    }

    /// Delete record `id`.
    ///
    /// Some endpoints answer with an empty body, returned as
    /// [`Payload::Raw`].
    #[tracing::instrument(skip(self), fields(resource = self.kind.name()))]
    pub async fn destroy(&self, id: impl Display + std::fmt::Debug) -> Result<Payload> {
        self.ensure(Verb::Destroy)?;
        self.client.delete(&self.member_path(id)).await
    }
}

/// The page a request actually asked for.
///
/// The caller's own `page` filter wins over the argument.
fn requested_page(params: &Filters, fallback: i64) -> i64 {
    match params.get(filters::PAGE) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}

pub(crate) fn encode_segment(id: impl Display) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}

/// Serialize `params` and insist on a JSON object.
pub(crate) fn require_object<P: Serialize + ?Sized>(
    operation: &'static str,
    params: &P,
) -> Result<Map<String, Value>> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        _ => Err(ZammadError::InvalidType {
            operation,
            expected: "a JSON object",
        }),
    }
}

/// Remove `key` from `body` and render it as a path segment.
fn take_id(
    operation: &'static str,
    body: &mut Map<String, Value>,
    key: &'static str,
) -> Result<String> {
    let missing = || ZammadError::MissingParameter {
        operation,
        parameter: key,
    };
    match body.remove(key) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(encode_segment(s)),
        _ => Err(missing()),
    }
}

impl ZammadClient {
    /// A generic resource of the given kind.
    pub fn resource(&self, kind: ResourceKind) -> Resource {
        Resource::new(self.clone(), kind)
    }

    pub fn group(&self) -> Resource {
        self.resource(ResourceKind::Group)
    }

    pub fn role(&self) -> Resource {
        self.resource(ResourceKind::Role)
    }

    pub fn organization(&self) -> Resource {
        self.resource(ResourceKind::Organization)
    }

    pub fn ticket(&self) -> Tickets {
        Tickets::new(self.clone())
    }

    pub fn ticket_article(&self) -> Resource {
        self.resource(ResourceKind::TicketArticle)
    }

    pub fn ticket_article_attachment(&self) -> TicketArticleAttachments {
        TicketArticleAttachments::new(self.clone())
    }

    pub fn ticket_article_plain(&self) -> Resource {
        self.resource(ResourceKind::TicketArticlePlain)
    }

    pub fn ticket_priority(&self) -> Resource {
        self.resource(ResourceKind::TicketPriority)
    }

    pub fn ticket_state(&self) -> Resource {
        self.resource(ResourceKind::TicketState)
    }

    pub fn user(&self) -> Users {
        Users::new(self.clone())
    }

    pub fn link(&self) -> Links {
        Links::new(self.clone())
    }

    pub fn tag(&self) -> Tags {
        Tags::new(self.clone())
    }

    pub fn tag_list(&self) -> Resource {
        self.resource(ResourceKind::TagList)
    }

    pub fn online_notification(&self) -> OnlineNotifications {
        OnlineNotifications::new(self.clone())
    }

    /// Object manager attributes.
    pub fn object(&self) -> ObjectAttributes {
        ObjectAttributes::new(self.clone())
    }

    pub fn knowledge_bases(&self) -> KnowledgeBases {
        KnowledgeBases::new(self.clone())
    }

    pub fn knowledge_bases_answers(&self) -> KnowledgeBaseAnswers {
        KnowledgeBaseAnswers::new(self.clone())
    }

    pub fn knowledge_bases_categories(&self) -> KnowledgeBaseCategories {
        KnowledgeBaseCategories::new(self.clone())
    }
}

/// Declare a wrapper around [`Resource`] for a kind with extra endpoints.
macro_rules! resource_wrapper {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name($crate::resource::Resource);

        impl $name {
            pub fn new(client: $crate::client::ZammadClient) -> Self {
                Self($crate::resource::Resource::new(client, $kind))
            }

            pub fn into_inner(self) -> $crate::resource::Resource {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::resource::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$name> for $crate::resource::Resource {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }
    };
}
pub(crate) use resource_wrapper;
