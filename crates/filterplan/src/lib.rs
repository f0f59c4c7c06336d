//! Query-string filter and pagination planning.
//!
//! This crate turns the query parameters of a collection request into a
//! storage-independent plan: one filter predicate and one page directive.
//! Parameters follow a small convention:
//!
//! - `q=text` - substring match on every free-text searchable field
//! - `search[field]=v` - equality; `v1|v2` for any of, `^v` for not equal
//! - `less[field]=v`, `greater[field]=v` - strict bounds
//! - `limit`, `offset`, `sort` (`-field` for descending) - pagination
//!
//! # Architecture
//!
//! - [`classify`] - maps parameter keys to their meaning
//! - [`coerce`] - converts raw text to the field's declared type
//! - [`predicate`] - the [`PredicateBackend`] seam, the builder, and two
//!   reference backends (AST and SQL)
//! - [`planner`] - orchestrates classification and predicate construction
//! - [`schema`] - entity field declarations
//! - [`types`] - filter, value, page and parameter types
//! - [`config`] - planner limits
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```
//! use filterplan::predicate::sql::SqlBackend;
//! use filterplan::schema::{EntitySchema, ValueType};
//! use filterplan::types::{FilterExpression, QueryParams};
//! use filterplan::QueryPlanner;
//!
//! let schema = EntitySchema::new("Ticket")
//!     .with_field("id", ValueType::Integer)
//!     .with_searchable_field("title", ValueType::Text)
//!     .with_field("status", ValueType::enumeration(["open", "closed"]))
//!     .with_field("tenant", ValueType::Text);
//!
//! let params = QueryParams::from_query_string("search[status]=^closed&sort=-id&limit=10");
//! let tenant = FilterExpression::equals("tenant", "acme");
//!
//! let backend = SqlBackend::new(&schema);
//! let plan = QueryPlanner::new(&schema)
//!     .plan(&backend, &params, Some(&tenant))
//!     .unwrap();
//!
//! assert_eq!(
//!     plan.filter.where_clause(),
//!     r#"WHERE ("tenant" = ?) AND ("status" != ?)"#
//! );
//! assert_eq!(
//!     backend.page_clause(&plan.page).sql,
//!     r#"ORDER BY "id" DESC LIMIT ? OFFSET ?"#
//! );
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod coerce;
pub mod config;
pub mod error;
pub mod planner;
pub mod predicate;
pub mod schema;
pub mod types;

pub use classify::{FieldKind, classify};
pub use coerce::{coerce, coerce_field};
pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult};
pub use planner::{QueryPlan, QueryPlanner, search_filter};
pub use predicate::{PredicateBackend, PredicateBuilder};
pub use schema::{EntitySchema, FieldDef, ValueType};
pub use types::{
    FilterExpression, FilterValue, PageSpec, QueryCombinator, QueryOperator, QueryParams,
    SortDirection, SortSpec, Value,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
