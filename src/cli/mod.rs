//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the zammad binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use crate::{Filters, ResourceKind};

/// Zammad API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "zammad", about = "Zammad API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Act on behalf of this user (id, login or email).
    #[arg(long, global = true, env = "ZAMMAD_ON_BEHALF_OF")]
    pub on_behalf_of: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single record by ID.
    Get {
        /// The type of record to get.
        entity: Entity,

        /// The record ID.
        id: String,
    },

    /// List records page by page.
    List {
        /// The type of record to list.
        entity: Entity,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Search records.
    Search {
        /// The type of record to search.
        entity: Entity,

        /// Search string, using Zammad's search syntax.
        query: String,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Create a record from a JSON document.
    Create {
        entity: Entity,

        /// The record as JSON, e.g. '{"name": "Support"}'.
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },

    /// Update a record with a JSON document.
    Update {
        entity: Entity,

        /// The record ID.
        id: String,

        /// Changed attributes as JSON.
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },

    /// Delete a record.
    Delete {
        entity: Entity,

        /// The record ID.
        id: String,
    },

    /// Show the authenticated user.
    Me,
}

/// Paging and filter options shared by `list` and `search`.
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Page number (1-indexed).
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Number of records per page.
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Follow next pages until the last one.
    #[arg(long)]
    pub all_pages: bool,

    /// Extra query parameter as key=value (repeatable).
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

impl PagingArgs {
    /// Build the filter set the library expects.
    pub fn to_filters(&self) -> Filters {
        let mut filters: Filters = self.filters.iter().cloned().collect();
        if let Some(per_page) = self.per_page {
            filters.insert("per_page", per_page);
        }
        filters
    }
}

/// Record types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    #[value(alias = "tickets")]
    Ticket,
    #[value(alias = "users")]
    User,
    #[value(alias = "groups")]
    Group,
    #[value(alias = "organizations")]
    Organization,
    #[value(alias = "roles")]
    Role,
    #[value(alias = "ticket-articles")]
    TicketArticle,
    #[value(alias = "ticket-priorities")]
    TicketPriority,
    #[value(alias = "ticket-states")]
    TicketState,
    #[value(alias = "tags")]
    TagList,
    #[value(alias = "online-notifications")]
    OnlineNotification,
    /// Object manager attributes.
    #[value(alias = "objects")]
    Object,
}

impl Entity {
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Ticket => ResourceKind::Ticket,
            Self::User => ResourceKind::User,
            Self::Group => ResourceKind::Group,
            Self::Organization => ResourceKind::Organization,
            Self::Role => ResourceKind::Role,
            Self::TicketArticle => ResourceKind::TicketArticle,
            Self::TicketPriority => ResourceKind::TicketPriority,
            Self::TicketState => ResourceKind::TicketState,
            Self::TagList => ResourceKind::TagList,
            Self::OnlineNotification => ResourceKind::OnlineNotification,
            Self::Object => ResourceKind::ObjectAttribute,
        }
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}
