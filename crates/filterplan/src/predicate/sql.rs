//! Parameterized SQL rendering.
//!
//! [`SqlBackend`] produces [`SqlFragment`]s: a clause with positional `?`
//! placeholders plus the values to bind, in placeholder order. The empty
//! fragment is the match-all predicate and renders as `1=1` in a `WHERE`
//! clause.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::PredicateBackend;
use super::expr::Predicate;
use crate::schema::{EntitySchema, ValueType};
use crate::types::{PageSpec, Value};

/// A SQL clause with bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Boolean parameter.
    Boolean(bool),
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

impl From<Value> for SqlParam {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => SqlParam::String(s),
            Value::Integer(i) => SqlParam::Integer(i),
            Value::Float(x) => SqlParam::Float(x),
            Value::Boolean(b) => SqlParam::Boolean(b),
            // stored by member name
            Value::Enum(e) => SqlParam::String(e.name),
        }
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SqlParam::Integer(i) => write!(f, "{}", i),
            SqlParam::Float(x) => write!(f, "{}", x),
            SqlParam::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Returns true for the empty (match-all) fragment.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Combines with another fragment using AND.
    pub fn and(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Combines with another fragment using OR.
    ///
    /// An empty side matches everything, so the result is empty too.
    pub fn or(mut self, other: SqlFragment) -> Self {
        if self.sql.is_empty() || other.sql.is_empty() {
            return SqlFragment::default();
        }
        self.sql = format!("({}) OR ({})", self.sql, other.sql);
        self.params.extend(other.params);
        self
    }

    /// Renders a `WHERE` clause.
    pub fn where_clause(&self) -> String {
        if self.sql.is_empty() {
            "WHERE 1=1".to_string()
        } else {
            format!("WHERE {}", self.sql)
        }
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, " -- [{}]", params.join(", "))?;
        }
        Ok(())
    }
}

/// Builds [`SqlFragment`]s for one entity schema.
///
/// Identifiers are double-quoted. Enum columns hold member names, so
/// ordering comparisons on enums expand to the members before or after the
/// bound in declaration order.
#[derive(Debug, Clone)]
pub struct SqlBackend {
    alias: Option<String>,
    enums: HashMap<String, Vec<String>>,
}

impl SqlBackend {
    /// Creates a backend for `schema` with unqualified column names.
    pub fn new(schema: &EntitySchema) -> Self {
        let enums = schema
            .fields()
            .iter()
            .filter_map(|f| match &f.value_type {
                ValueType::Enum { members } => Some((f.name.clone(), members.clone())),
                _ => None,
            })
            .collect();
        Self { alias: None, enums }
    }

    /// Prefixes every column with `alias.`.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns the quoted column reference for `field`.
    pub fn column(&self, field: &str) -> String {
        match &self.alias {
            Some(alias) => format!("{}.{}", quote_ident(alias), quote_ident(field)),
            None => quote_ident(field),
        }
    }

    /// Renders `ORDER BY <field> <dir> LIMIT ? OFFSET ?` for a page.
    pub fn page_clause(&self, page: &PageSpec) -> SqlFragment {
        let sort = page.sort();
        SqlFragment::with_params(
            format!(
                "ORDER BY {} {} LIMIT ? OFFSET ?",
                self.column(&sort.field),
                sort.direction.as_sql()
            ),
            vec![
                SqlParam::integer(i64::from(page.limit())),
                SqlParam::integer(i64::from(page.offset())),
            ],
        )
    }

    fn binary(&self, field: &str, op: &str, param: SqlParam) -> SqlFragment {
        SqlFragment::with_params(format!("{} {} ?", self.column(field), op), vec![param])
    }

    fn ordered(&self, field: &str, op: &str, value: Value) -> SqlFragment {
        let (value, members) = match value {
            Value::Enum(e) => match self.enums.get(field) {
                Some(members) => (e, members),
                // enum from another schema: compare by name
                None => return self.binary(field, op, SqlParam::String(e.name)),
            },
            other => return self.binary(field, op, other.into()),
        };

        let range = match op {
            "<" => &members[..value.ordinal.min(members.len())],
            _ => members.get(value.ordinal + 1..).unwrap_or_default(),
        };
        if range.is_empty() {
            return SqlFragment::new("1=0");
        }

        let placeholders = vec!["?"; range.len()].join(", ");
        SqlFragment::with_params(
            format!("{} IN ({})", self.column(field), placeholders),
            range.iter().map(SqlParam::string).collect(),
        )
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

impl PredicateBackend for SqlBackend {
    type Predicate = SqlFragment;

    fn match_all(&self) -> SqlFragment {
        SqlFragment::default()
    }

    fn equal(&self, field: &str, value: Value) -> SqlFragment {
        self.binary(field, "=", value.into())
    }

    fn not_equal(&self, field: &str, value: Value) -> SqlFragment {
        self.binary(field, "!=", value.into())
    }

    fn like(&self, field: &str, pattern: String) -> SqlFragment {
        self.binary(field, "LIKE", SqlParam::String(pattern))
    }

    fn less_than(&self, field: &str, value: Value) -> SqlFragment {
        self.ordered(field, "<", value)
    }

    fn greater_than(&self, field: &str, value: Value) -> SqlFragment {
        self.ordered(field, ">", value)
    }

    fn and(&self, left: SqlFragment, right: SqlFragment) -> SqlFragment {
        left.and(right)
    }

    fn or(&self, left: SqlFragment, right: SqlFragment) -> SqlFragment {
        left.or(right)
    }
}

impl Predicate {
    /// Compiles the predicate to SQL for `schema` with unqualified column
    /// names.
    pub fn to_sql(&self, schema: &EntitySchema) -> SqlFragment {
        self.replay(&SqlBackend::new(schema))
    }
}
