//! Pagination and sort directives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on `field`.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses a sort parameter value (e.g., "-age" for descending).
    pub fn parse(s: &str) -> Self {
        if let Some(stripped) = s.strip_prefix('-') {
            Self::descending(stripped)
        } else {
            Self::ascending(s)
        }
    }

    /// Returns true for descending order.
    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// Limit/offset pagination with a single sort key.
///
/// Built by [`QueryPlanner::plan_pagination`](crate::QueryPlanner::plan_pagination),
/// which guarantees `limit > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    limit: u32,
    offset: u32,
    sort: SortSpec,
}

impl PageSpec {
    /// Creates a page. A zero limit is raised to 1.
    pub fn new(limit: u32, offset: u32, sort: SortSpec) -> Self {
        Self {
            limit: limit.max(1),
            offset,
            sort,
        }
    }

    /// Returns the page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of records to skip.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the sort directive.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Returns the current page number (0-indexed).
    pub fn page_number(&self) -> u32 {
        self.offset / self.limit
    }

    /// Returns true if there are records before this page.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Returns the next page.
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
            sort: self.sort.clone(),
        }
    }

    /// Returns the previous page, or `None` on the first page.
    ///
    /// An offset that is not a multiple of the limit steps back to offset 0.
    pub fn previous(&self) -> Option<Self> {
        if !self.has_previous() {
            return None;
        }
        Some(Self {
            limit: self.limit,
            offset: self.offset.saturating_sub(self.limit),
            sort: self.sort.clone(),
        })
    }

    /// Returns the previous page, or the first page.
    pub fn previous_or_first(&self) -> Self {
        self.previous().unwrap_or_else(|| self.first())
    }

    /// Returns the first page.
    pub fn first(&self) -> Self {
        Self {
            limit: self.limit,
            offset: 0,
            sort: self.sort.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: u32, offset: u32) -> PageSpec {
        PageSpec::new(limit, offset, SortSpec::ascending("id"))
    }

    #[test]
    fn test_sort_parse() {
        let asc = SortSpec::parse("age");
        assert_eq!(asc.field, "age");
        assert_eq!(asc.direction, SortDirection::Ascending);

        let desc = SortSpec::parse("-age");
        assert_eq!(desc.field, "age");
        assert!(desc.is_descending());
        assert_eq!(desc.to_string(), "-age");
    }

    #[test]
    fn test_zero_limit_raised() {
        assert_eq!(page(0, 0).limit(), 1);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page(10, 30).page_number(), 3);
        assert_eq!(page(20, 0).page_number(), 0);
    }

    #[test]
    fn test_next_page() {
        let next = page(10, 0).next();
        assert_eq!(next.offset(), 10);
        assert_eq!(next.limit(), 10);
    }

    #[test]
    fn test_previous_page() {
        assert_eq!(page(10, 30).previous().unwrap().offset(), 20);
        assert_eq!(page(10, 5).previous().unwrap().offset(), 0);
        assert!(page(10, 0).previous().is_none());
    }

    #[test]
    fn test_previous_or_first() {
        assert_eq!(page(10, 0).previous_or_first().offset(), 0);
        assert_eq!(page(10, 20).previous_or_first().offset(), 10);
        assert_eq!(page(10, 20).first().offset(), 0);
    }
}
