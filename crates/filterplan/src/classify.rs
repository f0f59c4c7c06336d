//! Parameter key classification.
//!
//! Keys are matched against fixed keywords first, then against the three
//! bracketed patterns. The first matching rule wins; the rules cannot
//! overlap.
//!
//! | Key | Kind |
//! |-----|------|
//! | `q` | free-text search |
//! | `limit`, `offset`, `sort` | pagination |
//! | `search[field]` | equality / negation / alternation on `field` |
//! | `less[field]` | `field < value` |
//! | `greater[field]` | `field > value` |

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PlanError, PlanResult};

/// Free-text search keyword.
pub const FREE_TEXT_KEY: &str = "q";
/// Page size keyword.
pub const LIMIT_KEY: &str = "limit";
/// Sort keyword.
pub const SORT_KEY: &str = "sort";
/// Offset keyword.
pub const OFFSET_KEY: &str = "offset";

pub(crate) static FIELD_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("valid field name pattern"));
static SEARCH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^search\[\w+\]$").expect("valid search pattern"));
static LESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^less\[\w+\]$").expect("valid less pattern"));
static GREATER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^greater\[\w+\]$").expect("valid greater pattern"));

/// Semantic kind of a parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-text search across searchable fields.
    FreeText,
    /// Field search (`search[field]`).
    Search(String),
    /// Upper bound (`less[field]`).
    LessBound(String),
    /// Lower bound (`greater[field]`).
    GreaterBound(String),
    /// Page size.
    Limit,
    /// Records to skip.
    Offset,
    /// Sort directive.
    Sort,
}

/// Classifies a parameter key.
///
/// # Errors
///
/// Returns [`PlanError::UnrecognizedParameter`] when no rule matches.
pub fn classify(key: &str) -> PlanResult<FieldKind> {
    match key {
        FREE_TEXT_KEY => return Ok(FieldKind::FreeText),
        LIMIT_KEY => return Ok(FieldKind::Limit),
        SORT_KEY => return Ok(FieldKind::Sort),
        OFFSET_KEY => return Ok(FieldKind::Offset),
        _ => {}
    }

    let bracketed: [(&Regex, fn(String) -> FieldKind); 3] = [
        (&*SEARCH_PATTERN, FieldKind::Search),
        (&*LESS_PATTERN, FieldKind::LessBound),
        (&*GREATER_PATTERN, FieldKind::GreaterBound),
    ];

    for (pattern, kind) in bracketed {
        if pattern.is_match(key)
            && let Some(field) = bracketed_field(key)
        {
            return Ok(kind(field.to_string()));
        }
    }

    Err(PlanError::UnrecognizedParameter {
        key: key.to_string(),
    })
}

/// Extracts the text between the first `[` and the following `]`.
///
/// Examples:
/// - "search[age]" -> Some("age")
/// - "less[]" -> None
/// - "age" -> None
pub fn bracketed_field(key: &str) -> Option<&str> {
    let open = key.find('[')?;
    let rest = &key[open + 1..];
    let close = rest.find(']')?;
    let field = &rest[..close];
    (!field.is_empty()).then_some(field)
}
