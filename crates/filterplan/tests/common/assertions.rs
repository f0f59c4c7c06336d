//! Assertion helpers for plans and errors.

#![allow(dead_code)]

use filterplan::error::{PlanError, PlanResult};
use filterplan::predicate::expr::Predicate;

use super::fixtures::TicketFixture;

/// Returns the IDs of the tickets the predicate matches, in fixture order.
pub fn matching_ids(predicate: &Predicate, tickets: &[TicketFixture]) -> Vec<i64> {
    tickets
        .iter()
        .filter(|t| predicate.evaluate(&t.to_record()))
        .map(|t| t.id)
        .collect()
}

/// Asserts that the predicate matches exactly the given ticket IDs.
pub fn assert_matches(predicate: &Predicate, tickets: &[TicketFixture], expected: &[i64]) {
    let actual = matching_ids(predicate, tickets);
    assert_eq!(
        actual, expected,
        "Predicate {} matched {:?}, expected {:?}",
        predicate, actual, expected
    );
}

/// Asserts that a planning call failed with `MalformedSearchValue`.
pub fn assert_malformed<T: std::fmt::Debug>(result: PlanResult<T>) {
    assert!(
        matches!(result, Err(PlanError::MalformedSearchValue { .. })),
        "Expected MalformedSearchValue, got {:?}",
        result
    );
}

/// Asserts that a planning call failed with a coercion error on `field`.
pub fn assert_coercion_error<T: std::fmt::Debug>(result: PlanResult<T>, field: &str) {
    match result {
        Err(PlanError::Coercion { field: actual, .. }) => assert_eq!(
            actual, field,
            "Coercion error on {}, expected {}",
            actual, field
        ),
        other => panic!("Expected Coercion error on {}, got {:?}", field, other),
    }
}
