//! Query planning.
//!
//! [`QueryPlanner`] turns raw query parameters into a [`PageSpec`] and one
//! backend predicate. Every key is classified first, so an unknown key fails
//! both halves of the plan.
//!
//! # Duplicate keys
//!
//! Repeated `limit`, `offset` and `sort` keys resolve to the last occurrence.
//! Repeated filter keys all contribute: `greater[age]=1&greater[age]=5` ANDs
//! both bounds.
//!
//! # Search values
//!
//! | Value | Predicate |
//! |-------|-----------|
//! | `^closed` | `status != closed` |
//! | `open\|closed` | `status = open OR status = closed` |
//! | `open` | `status = open` |
//! | `^a\|b`, `^^a`, `^` | rejected |

use serde::Serialize;
use tracing::debug;

use crate::classify::{FieldKind, classify};
use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::predicate::{PredicateBackend, PredicateBuilder};
use crate::schema::EntitySchema;
use crate::types::{
    FilterExpression, PageSpec, QueryCombinator, QueryOperator, QueryParams, SortSpec,
};

/// A complete plan: the filter predicate plus the page to fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan<P> {
    /// Restricts which records are returned.
    pub filter: P,
    /// Limit, offset and sort order.
    pub page: PageSpec,
}

/// Plans queries against one entity schema.
///
/// A planner borrows its schema and holds no mutable state, so one schema can
/// serve any number of planners across threads.
#[derive(Debug, Clone)]
pub struct QueryPlanner<'a> {
    schema: &'a EntitySchema,
    config: PlannerConfig,
}

impl<'a> QueryPlanner<'a> {
    /// Creates a planner with default limits.
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self::with_config(schema, PlannerConfig::default())
    }

    /// Creates a planner with explicit limits.
    pub fn with_config(schema: &'a EntitySchema, config: PlannerConfig) -> Self {
        Self { schema, config }
    }

    /// Builds the page from `limit`, `offset` and `sort`.
    ///
    /// Defaults: the configured default limit, offset 0, ascending on the
    /// first declared field.
    pub fn plan_pagination(&self, params: &QueryParams) -> PlanResult<PageSpec> {
        let mut limit = None;
        let mut offset = None;
        let mut sort = None;

        for (key, value) in params.iter() {
            match classify(key)? {
                FieldKind::Limit => limit = Some(value),
                FieldKind::Offset => offset = Some(value),
                FieldKind::Sort => sort = Some(value),
                _ => {}
            }
        }

        let limit = match limit {
            Some(raw) => self.parse_limit(raw)?,
            None => self.config.default_limit,
        };
        let offset = match offset {
            Some(raw) => parse_offset(raw)?,
            None => 0,
        };
        let sort = match sort {
            Some(raw) => self.parse_sort(raw)?,
            None => self.default_sort()?,
        };

        let page = PageSpec::new(limit, offset, sort);
        debug!(
            entity = %self.schema.name(),
            limit = page.limit(),
            offset = page.offset(),
            sort = %page.sort(),
            "planned pagination"
        );
        Ok(page)
    }

    /// Builds the filter predicate.
    ///
    /// `default_filter`, when given, is built first and AND-ed with every
    /// parameter-derived predicate. With nothing to filter on, the backend's
    /// match-all predicate is returned.
    pub fn plan_filter<B: PredicateBackend>(
        &self,
        backend: &B,
        params: &QueryParams,
        default_filter: Option<&FilterExpression>,
    ) -> PlanResult<B::Predicate> {
        let builder = PredicateBuilder::new(self.schema, backend);
        let mut predicates = Vec::new();

        if let Some(filter) = default_filter {
            predicates.push(builder.build(filter)?);
        }

        for (key, value) in params.iter() {
            let predicate = match classify(key)? {
                FieldKind::FreeText => self.free_text(&builder, value)?,
                FieldKind::Search(field) => builder.build(&search_filter(&field, value)?)?,
                FieldKind::LessBound(field) => {
                    builder.build(&FilterExpression::less_than(field, value))?
                }
                FieldKind::GreaterBound(field) => {
                    builder.build(&FilterExpression::greater_than(field, value))?
                }
                FieldKind::Limit | FieldKind::Offset | FieldKind::Sort => continue,
            };
            predicates.push(predicate);
        }

        debug!(
            entity = %self.schema.name(),
            predicates = predicates.len(),
            default_filter = default_filter.is_some(),
            "planned filter"
        );

        // a single predicate comes back unwrapped
        Ok(builder.combine_all(predicates))
    }

    /// Builds both the filter and the page.
    pub fn plan<B: PredicateBackend>(
        &self,
        backend: &B,
        params: &QueryParams,
        default_filter: Option<&FilterExpression>,
    ) -> PlanResult<QueryPlan<B::Predicate>> {
        let page = self.plan_pagination(params)?;
        let filter = self.plan_filter(backend, params, default_filter)?;
        Ok(QueryPlan { filter, page })
    }

    fn free_text<B: PredicateBackend>(
        &self,
        builder: &PredicateBuilder<'_, B>,
        value: &str,
    ) -> PlanResult<B::Predicate> {
        let filters: Vec<FilterExpression> = self
            .schema
            .searchable_fields()
            .map(|f| FilterExpression::like(f.name.as_str(), value))
            .collect();

        if filters.is_empty() {
            return Err(PlanError::NoSearchableFields {
                entity: self.schema.name().to_string(),
            });
        }

        builder.from_list(&filters, QueryCombinator::Or)
    }

    fn parse_limit(&self, raw: &str) -> PlanResult<u32> {
        let limit: i64 = raw
            .parse()
            .map_err(|_| PlanError::invalid_pagination("limit", raw, "not an integer"))?;
        if limit <= 0 {
            return Err(PlanError::invalid_pagination(
                "limit",
                raw,
                "must be greater than 0",
            ));
        }

        let max = self.config.max_limit;
        if limit > i64::from(max) {
            debug!(requested = limit, max, "capping limit");
            return Ok(max);
        }
        u32::try_from(limit).map_err(|_| PlanError::invalid_pagination("limit", raw, "too large"))
    }

    fn parse_sort(&self, raw: &str) -> PlanResult<SortSpec> {
        let sort = SortSpec::parse(raw);
        if sort.field.is_empty() {
            return Err(PlanError::invalid_pagination(
                "sort",
                raw,
                "missing field name",
            ));
        }
        self.schema.field_type(&sort.field)?;
        Ok(sort)
    }

    fn default_sort(&self) -> PlanResult<SortSpec> {
        self.schema
            .first_field()
            .map(SortSpec::ascending)
            .ok_or_else(|| PlanError::InvalidSchema {
                message: format!("entity {} declares no fields", self.schema.name()),
            })
    }
}

fn parse_offset(raw: &str) -> PlanResult<u32> {
    let offset: i64 = raw
        .parse()
        .map_err(|_| PlanError::invalid_pagination("offset", raw, "not an integer"))?;
    if offset < 0 {
        return Err(PlanError::invalid_pagination(
            "offset",
            raw,
            "must not be negative",
        ));
    }
    u32::try_from(offset).map_err(|_| PlanError::invalid_pagination("offset", raw, "too large"))
}

/// Interprets a `search[field]` value.
///
/// A leading `^` negates a single value. Otherwise `|` separates alternatives,
/// empty alternatives are dropped, and the result is an `Equals` list (any
/// of). A value without `|`, or one that also contains `^`, is a single
/// alternative.
pub fn search_filter(field: &str, raw: &str) -> PlanResult<FilterExpression> {
    let malformed = || PlanError::MalformedSearchValue {
        field: field.to_string(),
        value: raw.to_string(),
    };

    if let Some(negated) = raw.strip_prefix('^') {
        if negated.is_empty() || negated.contains(['|', '^']) {
            return Err(malformed());
        }
        return Ok(FilterExpression::not_equals(field, negated));
    }

    let alternatives: Vec<String> = if raw.contains('|') && !raw.contains('^') {
        raw.split('|')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![raw.to_string()]
    };

    if alternatives.is_empty() {
        return Err(malformed());
    }
    FilterExpression::list(field, QueryOperator::Equals, alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::expr::{ExprBackend, Predicate};
    use crate::schema::ValueType;
    use crate::types::{FilterValue, SortDirection};

    fn schema() -> EntitySchema {
        EntitySchema::new("Ticket")
            .with_field("id", ValueType::Integer)
            .with_searchable_field("name", ValueType::Text)
            .with_field("age", ValueType::Integer)
    }

    fn params(query: &str) -> QueryParams {
        QueryParams::from_query_string(query)
    }

    #[test]
    fn test_search_filter_negation() {
        let filter = search_filter("status", "^closed").unwrap();
        assert_eq!(filter.operator(), QueryOperator::NotEquals);
        assert_eq!(filter.value(), &FilterValue::Single("closed".to_string()));

        for bad in ["^closed|open", "^^closed", "^", "^a^b"] {
            assert!(
                matches!(
                    search_filter("status", bad),
                    Err(PlanError::MalformedSearchValue { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_search_filter_alternation() {
        let filter = search_filter("status", "open||closed|").unwrap();
        assert_eq!(filter.operator(), QueryOperator::Equals);
        assert_eq!(
            filter.value(),
            &FilterValue::Many(vec!["open".to_string(), "closed".to_string()])
        );
        assert!(matches!(
            search_filter("status", "||"),
            Err(PlanError::MalformedSearchValue { .. })
        ));
    }

    #[test]
    fn test_search_filter_single() {
        let filter = search_filter("status", "open").unwrap();
        assert_eq!(filter.value(), &FilterValue::Many(vec!["open".to_string()]));

        // a caret after the first character is literal
        let filter = search_filter("name", "a^b|c").unwrap();
        assert_eq!(filter.value(), &FilterValue::Many(vec!["a^b|c".to_string()]));
    }

    #[test]
    fn test_pagination_defaults() {
        let schema = schema();
        let page = QueryPlanner::new(&schema)
            .plan_pagination(&QueryParams::new())
            .unwrap();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.sort().field, "id");
        assert_eq!(page.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_pagination_last_wins() {
        let schema = schema();
        let page = QueryPlanner::new(&schema)
            .plan_pagination(&params("limit=5&limit=7&sort=age&sort=-name"))
            .unwrap();
        assert_eq!(page.limit(), 7);
        assert_eq!(page.sort(), &SortSpec::descending("name"));
    }

    #[test]
    fn test_pagination_rejects_bad_values() {
        let schema = schema();
        let planner = QueryPlanner::new(&schema);
        for query in ["limit=0", "limit=-1", "limit=x", "offset=-5", "offset=1.5", "sort=", "sort=-"] {
            assert!(
                matches!(
                    planner.plan_pagination(&params(query)),
                    Err(PlanError::InvalidPagination { .. })
                ),
                "{query} should be rejected"
            );
        }
        assert!(matches!(
            planner.plan_pagination(&params("sort=missing")),
            Err(PlanError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_pagination_caps_limit() {
        let schema = schema();
        let planner = QueryPlanner::with_config(&schema, PlannerConfig::for_testing());
        let page = planner.plan_pagination(&params("limit=5000")).unwrap();
        assert_eq!(page.limit(), 100);
        let page = planner.plan_pagination(&QueryParams::new()).unwrap();
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_pagination_rejects_unknown_keys() {
        let schema = schema();
        let result = QueryPlanner::new(&schema).plan_pagination(&params("limit=5&foo=bar"));
        assert!(matches!(
            result,
            Err(PlanError::UnrecognizedParameter { .. })
        ));
    }

    #[test]
    fn test_filter_empty_is_match_all() {
        let schema = schema();
        let filter = QueryPlanner::new(&schema)
            .plan_filter(&ExprBackend, &params("limit=5&sort=-age"), None)
            .unwrap();
        assert_eq!(filter, Predicate::MatchAll);
    }

    #[test]
    fn test_filter_single_predicate_unwrapped() {
        let schema = schema();
        let filter = QueryPlanner::new(&schema)
            .plan_filter(&ExprBackend, &params("less[age]=30"), None)
            .unwrap();
        assert_eq!(filter.to_string(), "age < 30");
    }

    #[test]
    fn test_filter_default_first() {
        let schema = schema();
        let default = FilterExpression::equals("id", "1");
        let filter = QueryPlanner::new(&schema)
            .plan_filter(&ExprBackend, &params("greater[age]=18&q=bob"), Some(&default))
            .unwrap();
        assert_eq!(
            filter.to_string(),
            "(id = 1 AND age > 18 AND name LIKE '%bob%')"
        );
    }

    #[test]
    fn test_filter_repeated_keys_all_contribute() {
        let schema = schema();
        let filter = QueryPlanner::new(&schema)
            .plan_filter(&ExprBackend, &params("greater[age]=1&greater[age]=5"), None)
            .unwrap();
        assert_eq!(filter.to_string(), "(age > 1 AND age > 5)");
    }

    #[test]
    fn test_plan() {
        let schema = schema();
        let plan = QueryPlanner::new(&schema)
            .plan(&ExprBackend, &params("search[id]=^3&offset=40"), None)
            .unwrap();
        assert_eq!(plan.filter.to_string(), "id != 3");
        assert_eq!(plan.page.offset(), 40);
        assert_eq!(plan.page.page_number(), 2);
    }

    #[test]
    fn test_default_sort_needs_fields() {
        let schema = EntitySchema::new("Empty");
        let result = QueryPlanner::new(&schema).plan_pagination(&QueryParams::new());
        assert!(matches!(result, Err(PlanError::InvalidSchema { .. })));
    }
}
