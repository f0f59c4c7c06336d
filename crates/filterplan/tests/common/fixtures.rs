//! Test fixtures for query planning.

#![allow(dead_code)]

use std::collections::HashMap;

use filterplan::schema::{EntitySchema, ValueType};
use filterplan::types::Value;

/// Schema JSON for the ticket entity, as it would appear in a schema file.
pub const TICKET_SCHEMA_JSON: &str = r#"{
    "name": "Ticket",
    "fields": [
        {"name": "id", "type": {"kind": "integer"}},
        {"name": "name", "type": {"kind": "text"}, "searchable": true},
        {"name": "desc", "type": {"kind": "text"}, "searchable": true},
        {"name": "age", "type": {"kind": "integer"}},
        {"name": "score", "type": {"kind": "float"}},
        {"name": "status", "type": {"kind": "enum", "members": ["open", "closed", "pending"]}},
        {"name": "active", "type": {"kind": "boolean"}}
    ]
}"#;

/// A ticket entity with two searchable text fields.
pub fn ticket_schema() -> EntitySchema {
    EntitySchema::new("Ticket")
        .with_field("id", ValueType::Integer)
        .with_searchable_field("name", ValueType::Text)
        .with_searchable_field("desc", ValueType::Text)
        .with_field("age", ValueType::Integer)
        .with_field("score", ValueType::Float)
        .with_field("status", ValueType::enumeration(["open", "closed", "pending"]))
        .with_field("active", ValueType::Boolean)
}

/// An entity with no free-text searchable fields.
pub fn unsearchable_schema() -> EntitySchema {
    EntitySchema::new("Counter")
        .with_field("id", ValueType::Integer)
        .with_field("label", ValueType::Text)
}

/// A ticket row for in-memory evaluation.
#[derive(Debug, Clone)]
pub struct TicketFixture {
    /// Ticket ID.
    pub id: i64,
    /// Ticket name.
    pub name: String,
    /// Description.
    pub desc: String,
    /// Age in days.
    pub age: i64,
    /// Priority score.
    pub score: f64,
    /// Status member name.
    pub status: &'static str,
    /// Whether the ticket is active.
    pub active: bool,
}

impl TicketFixture {
    /// Creates an open, active ticket.
    pub fn new(id: i64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            desc: String::new(),
            age,
            score: 0.0,
            status: "open",
            active: true,
        }
    }

    /// Sets the description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: &'static str) -> Self {
        self.status = status;
        self
    }

    /// Sets the score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Marks the ticket inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Converts the fixture to a record keyed by field name.
    pub fn to_record(&self) -> HashMap<String, Value> {
        let ordinal = ["open", "closed", "pending"]
            .iter()
            .position(|s| *s == self.status)
            .expect("fixture status is a declared member");

        HashMap::from([
            ("id".to_string(), Value::Integer(self.id)),
            ("name".to_string(), Value::text(&self.name)),
            ("desc".to_string(), Value::text(&self.desc)),
            ("age".to_string(), Value::Integer(self.age)),
            ("score".to_string(), Value::Float(self.score)),
            ("status".to_string(), Value::enumeration(self.status, ordinal)),
            ("active".to_string(), Value::Boolean(self.active)),
        ])
    }
}

/// A small ticket data set.
pub fn sample_tickets() -> Vec<TicketFixture> {
    vec![
        TicketFixture::new(1, "login fails", 3).with_desc("foo on submit"),
        TicketFixture::new(2, "slow search", 20)
            .with_status("closed")
            .with_score(2.5),
        TicketFixture::new(3, "foobar crash", 45)
            .with_status("pending")
            .with_score(9.0),
        TicketFixture::new(4, "typo", 18).inactive(),
        TicketFixture::new(5, "export broken", 60)
            .with_desc("csv export")
            .with_status("closed")
            .with_score(4.0),
    ]
}
