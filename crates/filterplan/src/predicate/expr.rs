//! In-memory predicate AST.
//!
//! [`ExprBackend`] builds a [`Predicate`] tree that can be printed, serialized,
//! evaluated against records, or replayed onto any other backend. Nested
//! groups of the same kind are flattened as they are built, and the
//! match-all node never survives inside a conjunction.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::PredicateBackend;
use crate::types::Value;

/// Comparison operators used by [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Greater than.
    Gt,
}

impl CompareOp {
    /// Returns the operator symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }

    fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            CompareOp::Eq => ordering == Some(Ordering::Equal),
            CompareOp::Ne => ordering != Some(Ordering::Equal),
            CompareOp::Lt => ordering == Some(Ordering::Less),
            CompareOp::Gt => ordering == Some(Ordering::Greater),
        }
    }
}

/// A predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record.
    MatchAll,
    /// Compares a field against a typed value.
    Compare {
        /// The field.
        field: String,
        /// The comparison.
        op: CompareOp,
        /// The coerced value.
        value: Value,
    },
    /// SQL-style pattern match: `%` is any run, `_` is any one character.
    Like {
        /// The field.
        field: String,
        /// The pattern.
        pattern: String,
    },
    /// All children must match.
    And(Vec<Predicate>),
    /// At least one child must match.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Returns true for the match-all predicate.
    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::MatchAll)
    }

    /// Evaluates the predicate against a record.
    ///
    /// A comparison on a field the record does not carry is false.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::MatchAll => true,
            Predicate::Compare { field, op, value } => record
                .get(field)
                .is_some_and(|actual| op.holds(actual.compare(value))),
            Predicate::Like { field, pattern } => record
                .get(field)
                .and_then(Value::as_text)
                .is_some_and(|text| like_match(text, pattern)),
            Predicate::And(children) => children.iter().all(|c| c.evaluate(record)),
            Predicate::Or(children) => children.iter().any(|c| c.evaluate(record)),
        }
    }

    /// Rebuilds this predicate with another backend.
    pub fn replay<B: PredicateBackend>(&self, backend: &B) -> B::Predicate {
        match self {
            Predicate::MatchAll => backend.match_all(),
            Predicate::Compare { field, op, value } => {
                let value = value.clone();
                match op {
                    CompareOp::Eq => backend.equal(field, value),
                    CompareOp::Ne => backend.not_equal(field, value),
                    CompareOp::Lt => backend.less_than(field, value),
                    CompareOp::Gt => backend.greater_than(field, value),
                }
            }
            Predicate::Like { field, pattern } => backend.like(field, pattern.clone()),
            Predicate::And(children) => replay_group(children, backend, |b, l, r| b.and(l, r)),
            Predicate::Or(children) => replay_group(children, backend, |b, l, r| b.or(l, r)),
        }
    }
}

fn replay_group<B: PredicateBackend>(
    children: &[Predicate],
    backend: &B,
    join: impl Fn(&B, B::Predicate, B::Predicate) -> B::Predicate,
) -> B::Predicate {
    children
        .iter()
        .map(|c| c.replay(backend))
        .reduce(|acc, next| join(backend, acc, next))
        .unwrap_or_else(|| backend.match_all())
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::MatchAll => write!(f, "TRUE"),
            Predicate::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.symbol(), value)
            }
            Predicate::Like { field, pattern } => write!(f, "{} LIKE '{}'", field, pattern),
            Predicate::And(children) => write_group(f, children, " AND "),
            Predicate::Or(children) => write_group(f, children, " OR "),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

/// A record that predicates can be evaluated against.
pub trait Record {
    /// Returns the value of `field`, if present.
    fn get(&self, field: &str) -> Option<&Value>;
}

impl Record for HashMap<String, Value> {
    fn get(&self, field: &str) -> Option<&Value> {
        HashMap::get(self, field)
    }
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, field: &str) -> Option<&Value> {
        BTreeMap::get(self, field)
    }
}

/// Builds [`Predicate`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprBackend;

impl PredicateBackend for ExprBackend {
    type Predicate = Predicate;

    fn match_all(&self) -> Predicate {
        Predicate::MatchAll
    }

    fn equal(&self, field: &str, value: Value) -> Predicate {
        compare(field, CompareOp::Eq, value)
    }

    fn not_equal(&self, field: &str, value: Value) -> Predicate {
        compare(field, CompareOp::Ne, value)
    }

    fn like(&self, field: &str, pattern: String) -> Predicate {
        Predicate::Like {
            field: field.to_string(),
            pattern,
        }
    }

    fn less_than(&self, field: &str, value: Value) -> Predicate {
        compare(field, CompareOp::Lt, value)
    }

    fn greater_than(&self, field: &str, value: Value) -> Predicate {
        compare(field, CompareOp::Gt, value)
    }

    fn and(&self, left: Predicate, right: Predicate) -> Predicate {
        match (left, right) {
            (Predicate::MatchAll, other) | (other, Predicate::MatchAll) => other,
            (left, right) => {
                let mut children = Vec::new();
                for p in [left, right] {
                    match p {
                        Predicate::And(nested) => children.extend(nested),
                        other => children.push(other),
                    }
                }
                Predicate::And(children)
            }
        }
    }

    fn or(&self, left: Predicate, right: Predicate) -> Predicate {
        match (left, right) {
            (Predicate::MatchAll, _) | (_, Predicate::MatchAll) => Predicate::MatchAll,
            (left, right) => {
                let mut children = Vec::new();
                for p in [left, right] {
                    match p {
                        Predicate::Or(nested) => children.extend(nested),
                        other => children.push(other),
                    }
                }
                Predicate::Or(children)
            }
        }
    }
}

fn compare(field: &str, op: CompareOp, value: Value) -> Predicate {
    Predicate::Compare {
        field: field.to_string(),
        op,
        value,
    }
}

/// Case-sensitive SQL `LIKE` matching.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    // (pattern index after the last '%', text index it was tried at)
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '%' {
            p += 1;
            backtrack = Some((p, t));
        } else if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if let Some((bp, bt)) = backtrack {
            p = bp;
            t = bt + 1;
            backtrack = Some((bp, bt + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}
