//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The records a default mock server starts with.
#[derive(Debug, Clone)]
pub struct DefaultScenario {
    pub users: Vec<Value>,
    pub tickets: Vec<Value>,
    pub groups: Vec<Value>,
    pub me: Value,
}

impl Fixtures {
    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user record.
    pub fn user(id: u64, login: &str, firstname: &str, lastname: &str) -> Value {
        json!({
            "id": id,
            "login": login,
            "firstname": firstname,
            "lastname": lastname,
            "email": login,
            "active": true,
            "updated_at": "2024-03-01T10:15:00.000Z"
        })
    }

    /// `count` users with logins `user1@example.com`, `user2@example.com`, ...
    pub fn numbered_users(first_id: u64, count: u64) -> Vec<Value> {
        (0..count)
            .map(|i| {
                let id = first_id + i;
                Self::user(id, &format!("user{id}@example.com"), "Test", &format!("User {id}"))
            })
            .collect()
    }

    // =========================================================================
    // Ticket Fixtures
    // =========================================================================

    /// Create a ticket record.
    pub fn ticket(id: u64, number: &str, title: &str, state: &str) -> Value {
        json!({
            "id": id,
            "number": number,
            "title": title,
            "state": state,
            "group_id": 1,
            "customer_id": 2,
            "updated_at": "2024-03-01T10:15:00.000Z"
        })
    }

    // =========================================================================
    // Group Fixtures
    // =========================================================================

    /// Create a group record.
    pub fn group(id: u64, name: &str, note: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "note": note,
            "active": true
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// A fresh Zammad install: admin, one customer, one agent, the welcome
    /// ticket and the default group.
    pub fn default_scenario() -> DefaultScenario {
        let john = Self::user(3, "john@example.com", "John", "Doe");
        DefaultScenario {
            users: vec![
                Self::user(1, "admin@example.com", "Admin", "Istrator"),
                Self::user(2, "nicole.braun@zammad.org", "Nicole", "Braun"),
                john.clone(),
            ],
            tickets: vec![Self::ticket(1, "31001", "Welcome to Zammad!", "new")],
            groups: vec![Self::group(1, "Users", "Standard Group/Pool for Tickets.")],
            me: john,
        }
    }
}
