//! Common test utilities for query planning.
//!
//! - [`fixtures`] - schemas and in-memory ticket records
//! - [`assertions`] - predicate and error assertions

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
