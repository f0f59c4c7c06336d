//! Entity schema descriptors.
//!
//! An [`EntitySchema`] is built once per entity type, either programmatically
//! or from JSON, and then shared read-only by every planner that queries that
//! entity. It lists the declared fields in order, their value types, and which
//! fields take part in free-text (`q`) search.
//!
//! ```
//! use filterplan::schema::{EntitySchema, ValueType};
//!
//! let schema = EntitySchema::new("Ticket")
//!     .with_field("id", ValueType::Integer)
//!     .with_searchable_field("title", ValueType::Text)
//!     .with_field("status", ValueType::enumeration(["open", "closed"]));
//!
//! assert_eq!(schema.first_field(), Some("id"));
//! assert_eq!(schema.searchable_fields().count(), 1);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::FIELD_NAME_PATTERN;
use crate::error::{PlanError, PlanResult};

/// Declared value type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValueType {
    /// Floating point number.
    Float,
    /// Signed integer.
    Integer,
    /// Enumeration with members in declaration order.
    Enum {
        /// Member names.
        members: Vec<String>,
    },
    /// Boolean.
    Boolean,
    /// Anything else; compared as text.
    Text,
}

impl ValueType {
    /// Creates an enumeration type from member names.
    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum {
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Float => write!(f, "float"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Enum { .. } => write!(f, "enum"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Text => write!(f, "text"),
        }
    }
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as used in query parameters.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Whether the field takes part in free-text search.
    #[serde(default)]
    pub searchable: bool,
}

/// Ordered field declarations for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    name: String,
    fields: Vec<FieldDef>,
}

impl EntitySchema {
    /// Creates a schema with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a non-searchable field.
    pub fn with_field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            value_type,
            searchable: false,
        });
        self
    }

    /// Adds a free-text searchable field.
    pub fn with_searchable_field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            value_type,
            searchable: true,
        });
        self
    }

    /// Parses and validates a schema from JSON.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let schema: EntitySchema =
            serde_json::from_str(json).map_err(|e| PlanError::InvalidSchema {
                message: e.to_string(),
            })?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reads, parses and validates a schema file.
    pub fn from_file(path: impl AsRef<Path>) -> PlanResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PlanError::InvalidSchema {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Checks that the schema has fields, that field names are unique words
    /// matching `\w+`, that searchable fields are text and that enumerations
    /// are non-empty.
    pub fn validate(&self) -> PlanResult<()> {
        if self.fields.is_empty() {
            return Err(PlanError::InvalidSchema {
                message: format!("entity {} declares no fields", self.name),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !FIELD_NAME_PATTERN.is_match(&field.name) {
                return Err(PlanError::InvalidSchema {
                    message: format!("field name '{}' must be a non-empty word", field.name),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(PlanError::InvalidSchema {
                    message: format!("duplicate field {} on entity {}", field.name, self.name),
                });
            }
            if field.searchable && field.value_type != ValueType::Text {
                return Err(PlanError::InvalidSchema {
                    message: format!(
                        "searchable field {} must be text, not {}",
                        field.name, field.value_type
                    ),
                });
            }
            if let ValueType::Enum { members } = &field.value_type
                && members.is_empty()
            {
                return Err(PlanError::InvalidSchema {
                    message: format!("enum field {} has no members", field.name),
                });
            }
        }

        Ok(())
    }

    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the declared type of a field.
    pub fn field_type(&self, name: &str) -> PlanResult<&ValueType> {
        self.field(name)
            .map(|f| &f.value_type)
            .ok_or_else(|| PlanError::UnknownField {
                entity: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Returns the free-text searchable fields in declaration order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// Returns the first declared field (the default sort key).
    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(|f| f.name.as_str())
    }
}
