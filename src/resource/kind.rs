//! The closed set of resources the client knows about.

use std::fmt;

/// One of the six generic operations a [`Resource`](super::Resource) offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    All,
    Search,
    Find,
    Create,
    Update,
    Destroy,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Verb::All,
        Verb::Search,
        Verb::Find,
        Verb::Create,
        Verb::Update,
        Verb::Destroy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Search => "search",
            Self::Find => "find",
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a child resource is addressed below a knowledge base.
///
/// Create and update read the parent/child ids out of the payload and move
/// them into the path: `knowledge_bases/<kb>/<child>[/<id>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nesting {
    /// Path segment below the knowledge base (`answers`, `categories`).
    pub child: &'static str,
    /// Payload key naming the child on update.
    pub id_key: &'static str,
}

/// Payload key naming the parent knowledge base on create.
pub const KNOWLEDGE_BASE_ID: &str = "knowledge_base_id";

/// A remote collection and the verbs it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Group,
    Role,
    Organization,
    Ticket,
    TicketArticle,
    TicketArticleAttachment,
    TicketArticlePlain,
    TicketPriority,
    TicketState,
    User,
    Link,
    Tag,
    TagList,
    OnlineNotification,
    ObjectAttribute,
    KnowledgeBase,
    KnowledgeBaseAnswer,
    KnowledgeBaseCategory,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 18] = [
        Self::Group,
        Self::Role,
        Self::Organization,
        Self::Ticket,
        Self::TicketArticle,
        Self::TicketArticleAttachment,
        Self::TicketArticlePlain,
        Self::TicketPriority,
        Self::TicketState,
        Self::User,
        Self::Link,
        Self::Tag,
        Self::TagList,
        Self::OnlineNotification,
        Self::ObjectAttribute,
        Self::KnowledgeBase,
        Self::KnowledgeBaseAnswer,
        Self::KnowledgeBaseCategory,
    ];

    /// Path segment appended to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Group => "groups",
            Self::Role => "roles",
            Self::Organization => "organizations",
            Self::Ticket => "tickets",
            Self::TicketArticle => "ticket_articles",
            Self::TicketArticleAttachment => "ticket_attachment",
            Self::TicketArticlePlain => "ticket_article_plain",
            Self::TicketPriority => "ticket_priorities",
            Self::TicketState => "ticket_states",
            Self::User => "users",
            Self::Link => "links",
            Self::Tag => "tags",
            Self::TagList => "tag_list",
            Self::OnlineNotification => "online_notifications",
            Self::ObjectAttribute => "object_manager_attributes",
            Self::KnowledgeBase | Self::KnowledgeBaseAnswer | Self::KnowledgeBaseCategory => {
                "knowledge_bases"
            }
        }
    }

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Group => "Groups",
            Self::Role => "Roles",
            Self::Organization => "Organizations",
            Self::Ticket => "Tickets",
            Self::TicketArticle => "TicketArticles",
            Self::TicketArticleAttachment => "TicketArticleAttachments",
            Self::TicketArticlePlain => "TicketArticlePlain",
            Self::TicketPriority => "TicketPriorities",
            Self::TicketState => "TicketStates",
            Self::User => "Users",
            Self::Link => "Links",
            Self::Tag => "Tags",
            Self::TagList => "TagList",
            Self::OnlineNotification => "OnlineNotifications",
            Self::ObjectAttribute => "ObjectAttributes",
            Self::KnowledgeBase => "KnowledgeBases",
            Self::KnowledgeBaseAnswer => "KnowledgeBasesAnswers",
            Self::KnowledgeBaseCategory => "KnowledgeBasesCategories",
        }
    }

    /// Whether the generic `verb` exists for this resource.
    ///
    /// Knowledge-base entities have no flat collection endpoints: the base
    /// itself offers none of the generic verbs, answers and categories only
    /// create and update (addressed through their parent).
    pub fn supports(self, verb: Verb) -> bool {
        match self {
            Self::KnowledgeBase | Self::Tag => false,
            Self::KnowledgeBaseAnswer | Self::KnowledgeBaseCategory => {
                matches!(verb, Verb::Create | Verb::Update)
            }
            _ => true,
        }
    }

    pub(crate) fn nesting(self) -> Option<Nesting> {
        match self {
            Self::KnowledgeBaseAnswer => Some(Nesting {
                child: "answers",
                id_key: "answer_id",
            }),
            Self::KnowledgeBaseCategory => Some(Nesting {
                child: "categories",
                id_key: "category_id",
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
