//! Filter expression types.
//!
//! A [`FilterExpression`] describes one atomic comparison: a field, an
//! operator and either a single raw value or a list of raw values. Values stay
//! as text until predicate construction, where they are coerced to the
//! field's declared type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryOperator {
    /// Field equals value.
    Equals,
    /// Field does not equal value.
    NotEquals,
    /// Field matches a `%value%` pattern.
    Like,
    /// Field is strictly less than value.
    LessThan,
    /// Field is strictly greater than value.
    GreaterThan,
}

impl QueryOperator {
    /// Returns true if the operator accepts a list of values.
    pub fn accepts_list(&self) -> bool {
        matches!(self, QueryOperator::Equals | QueryOperator::NotEquals)
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equals => write!(f, "EQUALS"),
            QueryOperator::NotEquals => write!(f, "NOT_EQUALS"),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::LessThan => write!(f, "LESS_THAN"),
            QueryOperator::GreaterThan => write!(f, "GREATER_THAN"),
        }
    }
}

impl FromStr for QueryOperator {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EQUALS" => Ok(QueryOperator::Equals),
            "NOT_EQUALS" => Ok(QueryOperator::NotEquals),
            "LIKE" => Ok(QueryOperator::Like),
            "LESS_THAN" => Ok(QueryOperator::LessThan),
            "GREATER_THAN" => Ok(QueryOperator::GreaterThan),
            _ => Err(PlanError::UnsupportedOperator {
                operator: s.to_string(),
            }),
        }
    }
}

/// How sibling predicates are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryCombinator {
    /// All must match.
    And,
    /// Any may match.
    Or,
}

/// The raw value(s) of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// A single raw value.
    Single(String),
    /// A non-empty list of raw values.
    Many(Vec<String>),
}

/// An immutable description of one atomic comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter", into = "RawFilter")]
pub struct FilterExpression {
    field: String,
    operator: QueryOperator,
    value: FilterValue,
}

impl FilterExpression {
    /// Creates a filter, enforcing that exactly one of `value` and `values`
    /// is populated and that list values are used only with operators that
    /// accept them.
    pub fn new(
        field: impl Into<String>,
        operator: QueryOperator,
        value: Option<String>,
        values: Option<Vec<String>>,
    ) -> PlanResult<Self> {
        let field = field.into();
        match (value, values) {
            (Some(value), None) => Ok(Self::scalar(field, operator, value)),
            (None, Some(values)) => Self::list(field, operator, values),
            (Some(_), Some(_)) => Err(PlanError::InvalidFilter {
                field,
                message: "both value and values are set".to_string(),
            }),
            (None, None) => Err(PlanError::InvalidFilter {
                field,
                message: "neither value nor values is set".to_string(),
            }),
        }
    }

    /// Creates a single-value filter. Every operator accepts a single value.
    pub fn scalar(field: impl Into<String>, operator: QueryOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: FilterValue::Single(value.into()),
        }
    }

    /// Creates a list filter (`Equals` = any of, `NotEquals` = none of).
    pub fn list(
        field: impl Into<String>,
        operator: QueryOperator,
        values: Vec<String>,
    ) -> PlanResult<Self> {
        let field = field.into();
        if !operator.accepts_list() {
            return Err(PlanError::InvalidFilter {
                field,
                message: format!("operator {} does not accept a list of values", operator),
            });
        }
        if values.is_empty() {
            return Err(PlanError::InvalidFilter {
                field,
                message: "value list is empty".to_string(),
            });
        }
        Ok(Self {
            field,
            operator,
            value: FilterValue::Many(values),
        })
    }

    /// Shorthand for an `Equals` filter.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(field, QueryOperator::Equals, value)
    }

    /// Shorthand for a `NotEquals` filter.
    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(field, QueryOperator::NotEquals, value)
    }

    /// Shorthand for a `Like` filter.
    pub fn like(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(field, QueryOperator::Like, value)
    }

    /// Shorthand for a `LessThan` filter.
    pub fn less_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(field, QueryOperator::LessThan, value)
    }

    /// Shorthand for a `GreaterThan` filter.
    pub fn greater_than(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(field, QueryOperator::GreaterThan, value)
    }

    /// Returns the target field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the operator.
    pub fn operator(&self) -> QueryOperator {
        self.operator
    }

    /// Returns the raw value(s).
    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FilterValue::Single(v) => write!(f, "{} {} '{}'", self.field, self.operator, v),
            FilterValue::Many(vs) => write!(f, "{} {} [{}]", self.field, self.operator, vs.join(", ")),
        }
    }
}

/// Serialized form of a filter: `{"field", "operator", "value" | "values"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFilter {
    field: String,
    operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
}

impl TryFrom<RawFilter> for FilterExpression {
    type Error = PlanError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let operator = raw.operator.parse()?;
        FilterExpression::new(raw.field, operator, raw.value, raw.values)
    }
}

impl From<FilterExpression> for RawFilter {
    fn from(filter: FilterExpression) -> Self {
        let (value, values) = match filter.value {
            FilterValue::Single(v) => (Some(v), None),
            FilterValue::Many(vs) => (None, Some(vs)),
        };
        RawFilter {
            field: filter.field,
            operator: filter.operator.to_string(),
            value,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse() {
        assert_eq!(
            "not_equals".parse::<QueryOperator>().unwrap(),
            QueryOperator::NotEquals
        );
        assert_eq!("LIKE".parse::<QueryOperator>().unwrap(), QueryOperator::Like);
        assert!(matches!(
            "BETWEEN".parse::<QueryOperator>(),
            Err(PlanError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_new_requires_exactly_one_value() {
        let both = FilterExpression::new(
            "status",
            QueryOperator::Equals,
            Some("open".to_string()),
            Some(vec!["closed".to_string()]),
        );
        assert!(matches!(both, Err(PlanError::InvalidFilter { .. })));

        let neither = FilterExpression::new("status", QueryOperator::Equals, None, None);
        assert!(matches!(neither, Err(PlanError::InvalidFilter { .. })));

        let single =
            FilterExpression::new("status", QueryOperator::Equals, Some("open".to_string()), None)
                .unwrap();
        assert_eq!(single.value(), &FilterValue::Single("open".to_string()));
    }

    #[test]
    fn test_list_rejected_for_ordering_operators() {
        let result = FilterExpression::list(
            "age",
            QueryOperator::LessThan,
            vec!["1".to_string(), "2".to_string()],
        );
        assert!(matches!(result, Err(PlanError::InvalidFilter { .. })));

        let empty = FilterExpression::list("age", QueryOperator::Equals, vec![]);
        assert!(matches!(empty, Err(PlanError::InvalidFilter { .. })));
    }

    #[test]
    fn test_deserialize_validates() {
        let filter: FilterExpression =
            serde_json::from_str(r#"{"field": "tenant", "operator": "EQUALS", "value": "acme"}"#)
                .unwrap();
        assert_eq!(filter.field(), "tenant");
        assert_eq!(filter.operator(), QueryOperator::Equals);

        let bad = serde_json::from_str::<FilterExpression>(
            r#"{"field": "tenant", "operator": "EQUALS", "value": "a", "values": ["b"]}"#,
        );
        assert!(bad.is_err());

        let unknown = serde_json::from_str::<FilterExpression>(
            r#"{"field": "tenant", "operator": "BETWEEN", "value": "a"}"#,
        );
        assert!(unknown.unwrap_err().to_string().contains("unsupported operator"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FilterExpression::less_than("age", "30").to_string(),
            "age LESS_THAN '30'"
        );
    }
}
