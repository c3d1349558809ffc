//! Cell text coercion.
//!
//! Every cell in the sheet is text. These helpers convert between cell text and
//! the handful of typed values the record carries.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a visit count from cell text.
///
/// Surrounding whitespace is ignored. Blank or unparseable text yields `None`,
/// never zero.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number as cell text (`3.0` becomes `"3"`).
#[must_use]
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// Render a JSON value as cell text.
///
/// Strings are taken verbatim, numbers and booleans use their JSON text.
/// `null` has no cell text. Arrays and objects are written as compact JSON.
#[must_use]
pub fn json_to_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Deserialize an optional visit count from a JSON number or numeric text.
///
/// Blank or unparseable text becomes `None` rather than an error.
///
/// # Errors
///
/// Propagates deserializer errors for malformed input.
pub fn deserialize_visit_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3"), Some(3.0));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("2.5"), Some(2.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_json_to_cell() {
        assert_eq!(json_to_cell(&Value::Null), None);
        assert_eq!(json_to_cell(&serde_json::json!("x")).as_deref(), Some("x"));
        assert_eq!(json_to_cell(&serde_json::json!(7)).as_deref(), Some("7"));
        assert_eq!(json_to_cell(&serde_json::json!(true)).as_deref(), Some("true"));
        assert_eq!(
            json_to_cell(&serde_json::json!(["a", "b"])).as_deref(),
            Some(r#"["a","b"]"#)
        );
    }
}
