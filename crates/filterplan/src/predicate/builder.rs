use tracing::trace;

use super::PredicateBackend;
use crate::coerce::coerce_field;
use crate::error::{PlanError, PlanResult};
use crate::schema::EntitySchema;
use crate::types::{FilterExpression, FilterValue, QueryCombinator, QueryOperator, Value};

/// Turns [`FilterExpression`]s into backend predicates.
///
/// Raw values are coerced against the schema before they reach the backend,
/// so a backend only ever sees typed values.
#[derive(Debug)]
pub struct PredicateBuilder<'a, B> {
    schema: &'a EntitySchema,
    backend: &'a B,
}

impl<'a, B: PredicateBackend> PredicateBuilder<'a, B> {
    /// Creates a builder over `schema` producing predicates with `backend`.
    pub fn new(schema: &'a EntitySchema, backend: &'a B) -> Self {
        Self { schema, backend }
    }

    /// Builds the predicate for one filter.
    ///
    /// `Like` produces the pattern `%value%`. A list of values is only defined
    /// for `Equals` (any of) and `NotEquals` (none of).
    pub fn build(&self, filter: &FilterExpression) -> PlanResult<B::Predicate> {
        let field = filter.field();
        trace!(%filter, "building predicate");

        match filter.value() {
            FilterValue::Single(raw) => self.leaf(field, filter.operator(), raw),
            FilterValue::Many(raws) => {
                let combinator = match filter.operator() {
                    QueryOperator::Equals => QueryCombinator::Or,
                    QueryOperator::NotEquals => QueryCombinator::And,
                    other => {
                        return Err(PlanError::UnsupportedOperator {
                            operator: format!("{} with a list of values", other),
                        });
                    }
                };
                let leaves = raws
                    .iter()
                    .map(|raw| self.leaf(field, filter.operator(), raw))
                    .collect::<PlanResult<Vec<_>>>()?;
                Ok(self.fold(leaves, combinator))
            }
        }
    }

    /// Builds every filter and merges the results with `combinator`.
    ///
    /// An empty list yields the backend's match-all predicate.
    pub fn from_list(
        &self,
        filters: &[FilterExpression],
        combinator: QueryCombinator,
    ) -> PlanResult<B::Predicate> {
        let predicates = filters
            .iter()
            .map(|f| self.build(f))
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(self.fold(predicates, combinator))
    }

    /// AND-combines already built predicates.
    ///
    /// An empty list yields the backend's match-all predicate.
    pub fn combine_all(&self, predicates: Vec<B::Predicate>) -> B::Predicate {
        self.fold(predicates, QueryCombinator::And)
    }

    // The first predicate seeds the fold, so no identity element is ever
    // combined into a non-empty result.
    fn fold(&self, predicates: Vec<B::Predicate>, combinator: QueryCombinator) -> B::Predicate {
        predicates
            .into_iter()
            .reduce(|acc, next| self.backend.combine(combinator, acc, next))
            .unwrap_or_else(|| self.backend.match_all())
    }

    fn leaf(&self, field: &str, operator: QueryOperator, raw: &str) -> PlanResult<B::Predicate> {
        let backend = self.backend;
        match operator {
            QueryOperator::Equals => Ok(backend.equal(field, coerce_field(self.schema, field, raw)?)),
            QueryOperator::NotEquals => {
                Ok(backend.not_equal(field, coerce_field(self.schema, field, raw)?))
            }
            QueryOperator::LessThan => {
                Ok(backend.less_than(field, coerce_field(self.schema, field, raw)?))
            }
            QueryOperator::GreaterThan => {
                Ok(backend.greater_than(field, coerce_field(self.schema, field, raw)?))
            }
            QueryOperator::Like => {
                let prefixed = format!("%{}", raw);
                match coerce_field(self.schema, field, &prefixed)? {
                    Value::Text(mut pattern) => {
                        pattern.push('%');
                        Ok(backend.like(field, pattern))
                    }
                    other => Err(PlanError::Coercion {
                        field: field.to_string(),
                        expected: "text".to_string(),
                        raw: raw.to_string(),
                        reason: format!("LIKE needs a text pattern, got {}", other),
                    }),
                }
            }
        }
    }
}
