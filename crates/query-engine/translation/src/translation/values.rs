//! Handle the conversion of raw literals to typed values.
//!
//! Conversion happens during validation, once the target field's declared
//! type is known; a mismatch names that type rather than a guessed one.

use query_engine_metadata::metadata::{FieldInfo, ScalarType};
use query_engine_sql::sql;

use super::error::ValidationError;
use super::filter::Literal;

/// Convert a raw literal into a typed value of the field's declared type.
///
/// `field_name` is the exposed name, used for error reporting. Integer
/// literals coerce to `Numeric`; fractional literals do not coerce to
/// `Integer`. Dates are string literals in `YYYY-MM-DD` form and travel as
/// text parameters.
pub fn coerce_literal(
    field_name: &str,
    field: &FieldInfo,
    literal: &Literal,
) -> Result<sql::ast::Value, ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        field: field_name.to_string(),
        expected: field.r#type,
        literal: literal.to_string(),
    };

    match (field.r#type, literal) {
        (ScalarType::Integer, Literal::Number(raw)) => raw
            .parse::<i64>()
            .map(sql::ast::Value::Int8)
            .map_err(|_| mismatch()),
        (ScalarType::Numeric, Literal::Number(raw)) => raw
            .parse::<f64>()
            .map(sql::ast::Value::Float8)
            .map_err(|_| mismatch()),
        (ScalarType::Text, Literal::String(value)) => Ok(sql::ast::Value::String(value.clone())),
        (ScalarType::Boolean, Literal::Boolean(value)) => Ok(sql::ast::Value::Bool(*value)),
        (ScalarType::Date, Literal::String(value)) if is_calendar_date(value) => {
            Ok(sql::ast::Value::String(value.clone()))
        }
        _ => Err(mismatch()),
    }
}

/// Whether the text is a calendar-valid `YYYY-MM-DD` date.
fn is_calendar_date(text: &str) -> bool {
    let mut parts = text.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return false;
    }
    let (Some(year), Some(month), Some(day)) = (
        parse_digits(year),
        parse_digits(month),
        parse_digits(day),
    ) else {
        return false;
    };

    if !(1..=12).contains(&month) {
        return false;
    }
    let leap_year = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    let days_in_month = match month {
        4 | 6 | 9 | 11 => 30,
        2 if leap_year => 29,
        2 => 28,
        _ => 31,
    };
    (1..=days_in_month).contains(&day)
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.bytes().all(|byte| byte.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}
