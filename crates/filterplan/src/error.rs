//! Error types for query planning.
//!
//! Every failure aborts the whole planning call; there is no partial filter
//! application. Callers translate these into client-facing responses (usually
//! "bad request") using [`PlanError::is_client_error`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type PlanResult<T> = Result<T, PlanError>;

/// The error type for classification, coercion and predicate construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The parameter key matches no classification rule.
    #[error("unrecognized parameter: {key}")]
    UnrecognizedParameter {
        /// The offending key.
        key: String,
    },

    /// Free-text search was requested but the entity declares no searchable fields.
    #[error("entity {entity} declares no free-text searchable fields")]
    NoSearchableFields {
        /// The entity name.
        entity: String,
    },

    /// Negation combined with alternation or repeated negation, or nothing to match.
    #[error("malformed search value for {field}: {value}")]
    MalformedSearchValue {
        /// The field being searched.
        field: String,
        /// The raw value as received.
        value: String,
    },

    /// A raw string could not be converted to the declared field type.
    #[error("cannot convert '{raw}' to {expected} for field {field}: {reason}")]
    Coercion {
        /// The target field.
        field: String,
        /// Name of the declared value type.
        expected: String,
        /// The raw input.
        raw: String,
        /// Why conversion failed.
        reason: String,
    },

    /// An operator with no defined predicate construction.
    #[error("unsupported operator: {operator}")]
    UnsupportedOperator {
        /// The operator (or operator/value shape) that was rejected.
        operator: String,
    },

    /// The field is not declared by the entity schema.
    #[error("unknown field {field} on entity {entity}")]
    UnknownField {
        /// The entity name.
        entity: String,
        /// The field that was referenced.
        field: String,
    },

    /// A limit, offset or sort value is not usable.
    #[error("invalid {parameter} value '{value}': {message}")]
    InvalidPagination {
        /// Which pagination parameter.
        parameter: String,
        /// The raw value.
        value: String,
        /// Details.
        message: String,
    },

    /// A filter expression violates its construction rules.
    #[error("invalid filter on {field}: {message}")]
    InvalidFilter {
        /// The filter's field.
        field: String,
        /// Details.
        message: String,
    },

    /// An entity schema failed validation.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// Details.
        message: String,
    },
}

impl PlanError {
    /// Returns true if the error was caused by the request parameters rather
    /// than by the schema or programmatic filter configuration.
    pub fn is_client_error(&self) -> bool {
        match self {
            PlanError::UnrecognizedParameter { .. }
            | PlanError::MalformedSearchValue { .. }
            | PlanError::Coercion { .. }
            | PlanError::UnknownField { .. }
            | PlanError::InvalidPagination { .. } => true,
            PlanError::NoSearchableFields { .. }
            | PlanError::UnsupportedOperator { .. }
            | PlanError::InvalidFilter { .. }
            | PlanError::InvalidSchema { .. } => false,
        }
    }

    pub(crate) fn invalid_pagination(
        parameter: &str,
        value: &str,
        message: impl Into<String>,
    ) -> Self {
        PlanError::InvalidPagination {
            parameter: parameter.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
