//! Predicate construction.
//!
//! The planner never inspects the predicates it builds. Every leaf and every
//! combination goes through a [`PredicateBackend`], so the same plan can be
//! rendered as an in-memory AST ([`expr::ExprBackend`]), a parameterized SQL
//! fragment ([`sql::SqlBackend`]), or whatever a persistence layer supplies.
//!
//! ```
//! use filterplan::predicate::{PredicateBuilder, expr::ExprBackend};
//! use filterplan::schema::{EntitySchema, ValueType};
//! use filterplan::types::{FilterExpression, QueryCombinator};
//!
//! let schema = EntitySchema::new("Ticket")
//!     .with_field("age", ValueType::Integer)
//!     .with_field("status", ValueType::enumeration(["open", "closed"]));
//!
//! let builder = PredicateBuilder::new(&schema, &ExprBackend);
//! let predicate = builder
//!     .from_list(
//!         &[
//!             FilterExpression::greater_than("age", "18"),
//!             FilterExpression::equals("status", "open"),
//!         ],
//!         QueryCombinator::And,
//!     )
//!     .unwrap();
//!
//! assert_eq!(predicate.to_string(), "(age > 18 AND status = open)");
//! ```

mod builder;
pub mod expr;
pub mod sql;

pub use builder::PredicateBuilder;

use crate::types::{QueryCombinator, Value};

/// Produces opaque predicates for a storage layer.
///
/// Values handed to the leaf constructors are already coerced to the field's
/// declared type. `like` receives a complete pattern where `%` matches any run
/// of characters.
pub trait PredicateBackend {
    /// The predicate type this backend produces.
    type Predicate;

    /// A predicate that matches every record.
    fn match_all(&self) -> Self::Predicate;

    /// `field = value`.
    fn equal(&self, field: &str, value: Value) -> Self::Predicate;

    /// `field != value`.
    fn not_equal(&self, field: &str, value: Value) -> Self::Predicate;

    /// `field LIKE pattern`.
    fn like(&self, field: &str, pattern: String) -> Self::Predicate;

    /// `field < value`.
    fn less_than(&self, field: &str, value: Value) -> Self::Predicate;

    /// `field > value`.
    fn greater_than(&self, field: &str, value: Value) -> Self::Predicate;

    /// Conjunction.
    fn and(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    /// Disjunction.
    fn or(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    /// Merges two predicates with `combinator`.
    fn combine(
        &self,
        combinator: QueryCombinator,
        left: Self::Predicate,
        right: Self::Predicate,
    ) -> Self::Predicate {
        match combinator {
            QueryCombinator::And => self.and(left, right),
            QueryCombinator::Or => self.or(left, right),
        }
    }
}
