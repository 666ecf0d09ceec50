// Rust guideline compliant 2026-03-07

//! Field-level coercion helpers.
//!
//! The upstream workbooks arrive with loosely typed columns: business keys
//! may be serialized as JSON strings or numbers, and money fields as
//! numbers, numeric strings, or `null`. Everything in this module narrows
//! those raw shapes into the types the pipeline computes with.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::FieldError;

/// Number of trailing characters a full product reference code carries on
/// top of its base code (the SKU-to-base-product convention).
pub const DEFAULT_VARIANT_SUFFIX_LEN: usize = 2;

/// Derive the base product code by dropping the trailing variant suffix.
///
/// Codes shorter than the suffix collapse to the empty string, matching the
/// upstream convention. Safe on non-ASCII input: truncation counts
/// characters, not bytes.
#[must_use]
pub fn base_code(product_code: &str, suffix_len: usize) -> &str {
    let mut chars = product_code.char_indices();
    match chars.nth_back(suffix_len.saturating_sub(1)) {
        Some((idx, _)) if suffix_len > 0 => &product_code[..idx],
        _ if suffix_len == 0 => product_code,
        _ => "",
    }
}

/// Coerce an optional raw JSON value into `f64`.
///
/// Absent and `null` values fall back to `default`. Strings are trimmed and
/// parsed. Any other shape, or an unparseable string, is an error.
///
/// # Errors
///
/// Returns [`FieldError::InvalidNumericField`] naming `field` when the value
/// is present but cannot be read as a number.
pub fn numeric_or_default(
    field: &str,
    value: Option<&Value>,
    default: f64,
) -> Result<f64, FieldError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value {
        Value::Null => Ok(default),
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(field, value)),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Ok(n),
            Err(_) => Err(invalid(field, value)),
        },
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(invalid(field, value)),
    }
}

/// Best-effort numeric read: `None` for anything that is not a number.
///
/// Used where the pipeline copies a value through without computing on it,
/// so an unreadable value degrades to "absent" instead of failing.
#[must_use]
pub fn numeric_lenient(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn invalid(field: &str, value: &Value) -> FieldError {
    FieldError::InvalidNumericField { field: field.to_owned(), value: value.to_string() }
}

/// Deserialize an optional business key that may arrive as a JSON string or
/// number.
///
/// Workbook exports are inconsistent about branch and product identifiers;
/// integral numbers render without a fractional part so `12345` and
/// `"12345"` key identically.
pub(crate) fn de_opt_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(key_string))
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
