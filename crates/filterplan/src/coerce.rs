//! Conversion of raw parameter text into typed values.
//!
//! Every query value arrives as text. Comparisons, ordering ones in
//! particular, need the value typed like the field it is compared against,
//! so each raw string is converted according to the field's [`ValueType`].

use crate::error::{PlanError, PlanResult};
use crate::schema::{EntitySchema, ValueType};
use crate::types::Value;

/// Converts `raw` to the given value type.
///
/// The returned error names no field; use [`coerce_field`] to get errors that
/// do.
pub fn coerce(value_type: &ValueType, raw: &str) -> PlanResult<Value> {
    coerce_named("", value_type, raw)
}

/// Looks up `field` in `schema` and converts `raw` to its declared type.
pub fn coerce_field(schema: &EntitySchema, field: &str, raw: &str) -> PlanResult<Value> {
    let value_type = schema.field_type(field)?;
    coerce_named(field, value_type, raw)
}

pub(crate) fn coerce_named(field: &str, value_type: &ValueType, raw: &str) -> PlanResult<Value> {
    let fail = |reason: String| PlanError::Coercion {
        field: field.to_string(),
        expected: value_type.to_string(),
        raw: raw.to_string(),
        reason,
    };

    match value_type {
        ValueType::Float => {
            let x: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| fail(e.to_string()))?;
            if x.is_nan() {
                return Err(fail("NaN is not comparable".to_string()));
            }
            Ok(Value::Float(x))
        }
        ValueType::Integer => raw
            .parse()
            .map(Value::Integer)
            .map_err(|e: std::num::ParseIntError| fail(e.to_string())),
        ValueType::Enum { members } => members
            .iter()
            .position(|m| m == raw)
            .map(|ordinal| Value::enumeration(raw, ordinal))
            .ok_or_else(|| fail(format!("expected one of [{}]", members.join(", ")))),
        ValueType::Boolean => match raw {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(fail("expected 'true' or 'false'".to_string())),
        },
        ValueType::Text => Ok(Value::text(raw)),
    }
}
