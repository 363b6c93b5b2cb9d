//! Scalar coercion shared by the sanitizer and the validator.

use serde_json::{Number, Value};

use super::patterns::NUMERIC_LITERAL;

/// Coerce any JSON value into an integer count (e.g. centavos).
///
/// Never fails: nulls, composites and unparseable strings become `0`.
/// Floats round half away from zero and saturate at the `i64` bounds.
pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(flag) => i64::from(*flag),
        Value::Number(number) => number_to_int(number),
        Value::String(text) => parse_amount(text).unwrap_or(0),
        Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Stringify a scalar slot, trimmed. `null` and composites become `""`.
pub fn as_string(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
    }
}

fn number_to_int(number: &Number) -> i64 {
    if let Some(int) = number.as_i64() {
        int
    } else if number.is_u64() {
        i64::MAX
    } else {
        number.as_f64().map(round_to_int).unwrap_or(0)
    }
}

fn round_to_int(value: f64) -> i64 {
    if value.is_finite() {
        // `as` saturates out-of-range floats.
        value.round() as i64
    } else {
        0
    }
}

/// Parse an amount written with the fixed pt-BR heuristic.
///
/// With both `.` and `,` present, `.` groups thousands and `,` is the decimal
/// separator, whatever their order. A lone `,` is a decimal separator.
fn parse_amount(text: &str) -> Option<i64> {
    let compact: String = text.trim().chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() {
        return None;
    }

    let literal = normalize_separators(&compact);
    if !NUMERIC_LITERAL.is_match(&literal) {
        return None;
    }

    let parsed: f64 = literal.parse().ok()?;
    parsed.is_finite().then(|| round_to_int(parsed))
}

fn normalize_separators(compact: &str) -> String {
    match (compact.contains('.'), compact.contains(',')) {
        (true, true) => compact.replace('.', "").replace(',', "."),
        (false, true) => compact.replace(',', "."),
        _ => compact.to_string(),
    }
}
