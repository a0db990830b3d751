//! Lenient field readers used while deserializing catalog documents.
//!
//! Exported catalogs come from spreadsheets and OCR review, so numbers may
//! arrive as strings, prices as bare numbers, and identifiers as integers.
//! Everything is folded into one canonical shape here; the rest of the crate
//! never inspects raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse user-entered numeric text. Anything unparseable, negative or
/// non-finite becomes `0`.
pub fn parse_amount(text: &str) -> f64 {
    text.trim().parse::<f64>().map(non_negative).unwrap_or(0.0)
}

/// Clamp to a finite, non-negative value.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub(crate) fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(number) => non_negative(number.as_f64().unwrap_or(0.0)),
        Value::String(text) => parse_amount(text),
        _ => 0.0,
    }
}

fn value_to_opt_f64(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    raw.is_finite().then_some(raw)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

pub(crate) fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_opt_f64(&value))
}

pub(crate) fn opt_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_opt_f64(&value)
        .filter(|rank| *rank >= 0.0 && *rank <= f64::from(u32::MAX))
        .map(|rank| rank.trunc() as u32))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = value_to_text(&value);
    Ok((!text.is_empty()).then_some(text))
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(text.trim(), "1" | "true" | "TRUE" | "True" | "yes"),
        _ => false,
    })
}

/// Drop `null` list entries and tolerate a `null` list.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let entries: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().flatten().collect())
}

/// Identity fallback chain shared by pack items and catalog items: explicit
/// id, then `item_id`, then the display name. Empty values are skipped.
pub fn item_identity<'a>(id: Option<&'a str>, item_id: Option<&'a str>, name: &'a str) -> &'a str {
    id.filter(|v| !v.is_empty())
        .or_else(|| item_id.filter(|v| !v.is_empty()))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_defaults_garbage_to_zero() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount("  7 "), 7.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("-4"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn numeric_values_accept_strings_and_numbers() {
        assert_eq!(value_to_f64(&serde_json::json!(3)), 3.0);
        assert_eq!(value_to_f64(&serde_json::json!("4.25")), 4.25);
        assert_eq!(value_to_f64(&serde_json::json!(null)), 0.0);
        assert_eq!(value_to_f64(&serde_json::json!({"amount": 1})), 0.0);
    }

    #[test]
    fn optional_numbers_keep_absence() {
        assert_eq!(value_to_opt_f64(&serde_json::json!(null)), None);
        assert_eq!(value_to_opt_f64(&serde_json::json!("x")), None);
        assert_eq!(value_to_opt_f64(&serde_json::json!("2")), Some(2.0));
    }

    #[test]
    fn identity_chain_skips_empty_values() {
        assert_eq!(item_identity(Some("a"), Some("b"), "c"), "a");
        assert_eq!(item_identity(Some(""), Some("b"), "c"), "b");
        assert_eq!(item_identity(None, None, "c"), "c");
    }
}
