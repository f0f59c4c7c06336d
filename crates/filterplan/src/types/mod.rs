//! Core data types for query planning.
//!
//! - [`FilterExpression`], [`QueryOperator`], [`QueryCombinator`] - filter descriptions
//! - [`Value`] - typed scalars produced by coercion
//! - [`PageSpec`], [`SortSpec`] - pagination directives
//! - [`QueryParams`] - raw, ordered query parameters
//!
//! # Examples
//!
//! ```
//! use filterplan::types::{FilterExpression, QueryOperator, QueryParams, SortSpec};
//!
//! let tenant = FilterExpression::equals("tenant", "acme");
//! assert_eq!(tenant.operator(), QueryOperator::Equals);
//!
//! let params = QueryParams::from_query_string("search%5Bstatus%5D=open&sort=-age");
//! assert_eq!(params.get("sort"), Some("-age"));
//! assert!(SortSpec::parse("-age").is_descending());
//! ```

mod filter;
mod page;
mod params;
mod value;

pub use filter::{FilterExpression, FilterValue, QueryCombinator, QueryOperator};
pub use page::{PageSpec, SortDirection, SortSpec};
pub use params::QueryParams;
pub use value::{EnumValue, Value};
