//! Field coercion helpers
//!
//! Each helper turns one raw JSON value into a typed field value or the
//! user-facing message describing why it cannot.

use serde_json::Value;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "A valid integer is required.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";

/// Name used in type-mismatch messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Validate a text field: numbers are stringified, whitespace is trimmed,
/// blank values and NUL characters are rejected.
pub fn validate_char_field(value: &Value) -> Result<String, String> {
    let text = match value {
        Value::Null => return Err(NOT_NULL.to_string()),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(NOT_A_STRING.to_string())
        }
    };

    if text.is_empty() {
        return Err(NOT_BLANK.to_string());
    }
    // Postgres text columns cannot hold NUL.
    if text.contains('\0') {
        return Err(NULL_CHARACTERS.to_string());
    }
    Ok(text)
}

/// Parse an integer written as text, accepting a trailing `.0` fraction.
pub fn parse_integral(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = match text.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => text,
    };
    digits.parse::<i64>().ok()
}

/// Validate a 32-bit integer field.
pub fn validate_integer_field(value: &Value) -> Result<i32, String> {
    let wide = match value {
        Value::Null => return Err(NOT_NULL.to_string()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e18)
                .map(|f| f as i64),
        },
        Value::String(s) => parse_integral(s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
    .ok_or_else(|| NOT_AN_INTEGER.to_string())?;

    if wide > i64::from(i32::MAX) {
        return Err(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ));
    }
    if wide < i64::from(i32::MIN) {
        return Err(format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        ));
    }
    Ok(wide as i32)
}

/// Validate a reference to another record by primary key.
pub fn validate_primary_key_field(value: &Value) -> Result<i64, String> {
    let incorrect_type = || {
        format!(
            "Incorrect type. Expected pk value, received {}.",
            json_type_name(value)
        )
    };

    match value {
        Value::Null => Err(NOT_NULL.to_string()),
        Value::Number(n) => n.as_i64().ok_or_else(incorrect_type),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| incorrect_type()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(incorrect_type()),
    }
}

/// Message for a reference to a record that does not exist.
pub fn does_not_exist(pk: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", pk)
}
