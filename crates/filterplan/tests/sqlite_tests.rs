//! Rendered SQL executed against SQLite, checked against in-memory evaluation.

mod common;

use common::*;
use filterplan::predicate::expr::ExprBackend;
use filterplan::predicate::sql::{SqlBackend, SqlFragment, SqlParam};
use filterplan::{QueryParams, QueryPlanner};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params, params_from_iter};

// ============================================================================
// Helpers
// ============================================================================

fn ticket_table() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"CREATE TABLE tickets (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            "desc" TEXT NOT NULL,
            age INTEGER NOT NULL,
            score REAL NOT NULL,
            status TEXT NOT NULL,
            active INTEGER NOT NULL
        )"#,
    )
    .unwrap();

    for t in sample_tickets() {
        conn.execute(
            r#"INSERT INTO tickets (id, name, "desc", age, score, status, active)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![t.id, t.name, t.desc, t.age, t.score, t.status, t.active],
        )
        .unwrap();
    }
    conn
}

fn bind(param: &SqlParam) -> SqlValue {
    match param {
        SqlParam::String(s) => SqlValue::Text(s.clone()),
        SqlParam::Integer(i) => SqlValue::Integer(*i),
        SqlParam::Float(x) => SqlValue::Real(*x),
        SqlParam::Boolean(b) => SqlValue::Integer(i64::from(*b)),
    }
}

fn select_ids(conn: &Connection, filter: &SqlFragment) -> Vec<i64> {
    let sql = format!("SELECT id FROM tickets {} ORDER BY id", filter.where_clause());
    let mut stmt = conn.prepare(&sql).unwrap();
    let ids = stmt
        .query_map(params_from_iter(filter.params.iter().map(bind)), |row| {
            row.get(0)
        })
        .unwrap()
        .collect::<Result<Vec<i64>, _>>()
        .unwrap();
    ids
}

/// Plans `query` on both backends and checks SQLite returns the rows the
/// predicate matches in memory.
fn assert_backends_agree(conn: &Connection, query: &str) -> Vec<i64> {
    let schema = ticket_schema();
    let planner = QueryPlanner::new(&schema);
    let params = QueryParams::from_query_string(query);

    let predicate = planner.plan_filter(&ExprBackend, &params, None).unwrap();
    let filter = planner
        .plan_filter(&SqlBackend::new(&schema).with_alias("tickets"), &params, None)
        .unwrap();

    let expected = matching_ids(&predicate, &sample_tickets());
    let actual = select_ids(conn, &filter);
    assert_eq!(
        actual, expected,
        "SQL rows differ from in-memory rows for {query}: {filter}"
    );
    actual
}

// ============================================================================
// Enum ordering
// ============================================================================

#[test]
fn test_enum_bounds_follow_declaration_order() {
    let conn = ticket_table();

    assert_eq!(assert_backends_agree(&conn, "greater[status]=open"), vec![2, 3, 5]);
    assert_eq!(assert_backends_agree(&conn, "less[status]=pending"), vec![1, 2, 4, 5]);
    assert_eq!(assert_backends_agree(&conn, "greater[status]=closed"), vec![3]);
    assert!(assert_backends_agree(&conn, "less[status]=open").is_empty());
    assert!(assert_backends_agree(&conn, "greater[status]=pending").is_empty());
}

#[test]
fn test_enum_bounds_combined_with_other_filters() {
    let conn = ticket_table();

    assert_eq!(
        assert_backends_agree(&conn, "q=foo&greater[status]=open"),
        vec![3]
    );
    assert_eq!(
        assert_backends_agree(&conn, "less[status]=closed&search[status]=^open&limit=2"),
        Vec::<i64>::new()
    );
}

// ============================================================================
// Other value types
// ============================================================================

#[test]
fn test_scalar_filters_match_in_memory() {
    let conn = ticket_table();

    assert_eq!(
        assert_backends_agree(&conn, "q=foo&search[status]=^closed"),
        vec![1, 3]
    );
    assert_eq!(
        assert_backends_agree(&conn, "search[age]=3|18|60&greater[score]=1"),
        vec![5]
    );
    assert_eq!(assert_backends_agree(&conn, "search[active]=false"), vec![4]);
    assert_eq!(assert_backends_agree(&conn, "less[name]=m"), vec![1, 3, 5]);
    assert_eq!(
        assert_backends_agree(&conn, "greater[age]=10&less[score]=5.5"),
        vec![2, 4, 5]
    );
    assert_eq!(assert_backends_agree(&conn, ""), vec![1, 2, 3, 4, 5]);
}
