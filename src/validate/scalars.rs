//! Scalar validators for numbers, enums, and CLI option strings.
//!
//! Each function encodes exactly one numeric policy. Leniency is per-function
//! and deliberate: `validate_currency_code` defaults on a wrong *type* (but
//! not a wrong value), and `get_number_or_default` is total. Nothing else
//! silently substitutes a default.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{AiProvider, CurrencyCode};

/// A finite number. Rejects non-numeric types and NaN.
pub fn validate_number(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let n = value
        .as_f64()
        .ok_or_else(|| ValidationError::new(field, "must be a number"))?;
    if n.is_nan() {
        return Err(ValidationError::new(field, "must not be NaN"));
    }
    if !n.is_finite() {
        return Err(ValidationError::new(field, "must be finite"));
    }
    Ok(n)
}

/// A finite number strictly greater than zero.
pub fn validate_positive_number(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let n = validate_number(value, field)?;
    if n <= 0.0 {
        return Err(ValidationError::with_value(
            field,
            n.to_string(),
            "must be greater than zero",
        ));
    }
    Ok(n)
}

/// A finite number greater than or equal to zero.
pub fn validate_non_negative_number(value: &Value, field: &str) -> Result<f64, ValidationError> {
    let n = validate_number(value, field)?;
    if n < 0.0 {
        return Err(ValidationError::with_value(
            field,
            n.to_string(),
            "must not be negative",
        ));
    }
    Ok(n)
}

/// Currency codes are lenient on type, strict on value: a non-string input
/// yields the default (`MYR`) because the field is optional everywhere it
/// appears, while a string outside the closed set is a hard failure.
pub fn validate_currency_code(value: &Value) -> Result<CurrencyCode, ValidationError> {
    let Some(s) = value.as_str() else {
        return Ok(CurrencyCode::default());
    };
    s.parse::<CurrencyCode>()
        .map_err(|message| ValidationError::with_value("currency", s, message))
}

/// Strict closed-set check for AI provider names.
pub fn validate_ai_provider(value: &Value, field: &str) -> Result<AiProvider, ValidationError> {
    let s = value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, "must be a string"))?;
    AiProvider::parse(s).ok_or_else(|| {
        ValidationError::with_value(
            field,
            s,
            format!("unknown provider, valid: {}", AiProvider::VALID_SET),
        )
    })
}

/// Parse a CLI option string as a strictly positive integer.
///
/// A fractional part is truncated toward zero (radix-10 integer parsing
/// semantics), not rejected. Truncation happens before the positivity rule,
/// so an input in (0, 1) is rejected rather than collapsing to zero.
pub fn parse_positive_integer(raw: &str, field: &str) -> Result<u64, ValidationError> {
    let n = parse_non_negative_integer(raw, field)?;
    if n == 0 {
        return Err(ValidationError::with_value(
            field,
            raw,
            "must be greater than zero",
        ));
    }
    Ok(n)
}

/// Parse a CLI option string as a non-negative integer. Zero is valid here,
/// unlike [`parse_positive_integer`]; customer counts start at zero.
pub fn parse_non_negative_integer(raw: &str, field: &str) -> Result<u64, ValidationError> {
    let n: f64 = raw.trim().parse().map_err(|_| {
        ValidationError::with_value(field, raw, "must be a number")
    })?;
    if n.is_nan() {
        return Err(ValidationError::new(field, "must not be NaN"));
    }
    if !n.is_finite() {
        return Err(ValidationError::new(field, "must be finite"));
    }
    if n < 0.0 {
        return Err(ValidationError::with_value(
            field,
            raw,
            "must not be negative",
        ));
    }
    Ok(n.trunc() as u64)
}

/// Parse a CLI option string as a strictly positive number.
pub fn parse_positive_number(raw: &str, field: &str) -> Result<f64, ValidationError> {
    let n: f64 = raw.trim().parse().map_err(|_| {
        ValidationError::with_value(field, raw, "must be a number")
    })?;
    if n.is_nan() {
        return Err(ValidationError::new(field, "must not be NaN"));
    }
    if !n.is_finite() {
        return Err(ValidationError::new(field, "must be finite"));
    }
    if n <= 0.0 {
        return Err(ValidationError::with_value(
            field,
            raw,
            "must be greater than zero",
        ));
    }
    Ok(n)
}

/// Total lookup for optional numeric arguments: a missing key, non-number,
/// NaN, zero, or negative value yields the default. Only a strictly positive
/// number overrides it. No error path.
pub fn get_number_or_default(args: &Map<String, Value>, key: &str, default: f64) -> f64 {
    match args.get(key).and_then(Value::as_f64) {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_validate_number_rejects_non_numbers() {
        assert!(validate_number(&json!("12"), "price").is_err());
        assert!(validate_number(&json!(null), "price").is_err());
        assert!(validate_number(&json!([1]), "price").is_err());
    }

    #[test]
    fn test_validate_number_accepts_integers_and_floats() {
        assert_eq!(validate_number(&json!(12), "price").unwrap(), 12.0);
        assert_eq!(validate_number(&json!(0.5), "price").unwrap(), 0.5);
        assert_eq!(validate_number(&json!(-3), "delta").unwrap(), -3.0);
    }

    #[test]
    fn test_positive_number_policy() {
        assert!(validate_positive_number(&json!(0), "price").is_err());
        assert!(validate_positive_number(&json!(-1), "price").is_err());
        assert_eq!(validate_positive_number(&json!(29), "price").unwrap(), 29.0);
    }

    #[test]
    fn test_non_negative_number_policy() {
        assert_eq!(
            validate_non_negative_number(&json!(0), "cost").unwrap(),
            0.0
        );
        let err = validate_non_negative_number(&json!(-0.5), "cost").unwrap_err();
        assert_eq!(err.field, "cost");
    }

    #[test]
    fn test_currency_defaults_on_non_string() {
        assert_eq!(
            validate_currency_code(&json!(null)).unwrap(),
            CurrencyCode::MYR
        );
        assert_eq!(
            validate_currency_code(&json!(42)).unwrap(),
            CurrencyCode::MYR
        );
    }

    #[test]
    fn test_currency_strict_on_value() {
        assert_eq!(
            validate_currency_code(&json!("usd")).unwrap(),
            CurrencyCode::USD
        );
        let err = validate_currency_code(&json!("BTC")).unwrap_err();
        assert!(err.message.contains("MYR"));
        assert!(err.message.contains("AUD"));
    }

    #[test]
    fn test_ai_provider_closed_set() {
        assert_eq!(
            validate_ai_provider(&json!("anthropic"), "provider").unwrap(),
            AiProvider::Anthropic
        );
        let err = validate_ai_provider(&json!("skynet"), "provider").unwrap_err();
        assert!(err.message.contains("openai"));
        assert!(validate_ai_provider(&json!(7), "provider").is_err());
    }

    #[test]
    fn test_parse_positive_integer_truncates() {
        assert_eq!(parse_positive_integer("100", "customers").unwrap(), 100);
        assert_eq!(parse_positive_integer("99.9", "customers").unwrap(), 99);
    }

    #[test]
    fn test_parse_positive_integer_rejects_garbage() {
        assert!(parse_positive_integer("abc", "customers").is_err());
        assert!(parse_positive_integer("0", "customers").is_err());
        assert!(parse_positive_integer("-5", "customers").is_err());
        assert!(parse_positive_integer("NaN", "customers").is_err());
    }

    #[test]
    fn test_parse_positive_integer_rejects_sub_one_fractions() {
        // Truncation runs before the positivity rule, so these are zero.
        assert!(parse_positive_integer("0.9", "customers").is_err());
        assert!(parse_positive_integer("0.0001", "customers").is_err());
        assert_eq!(parse_positive_integer("1.9", "customers").unwrap(), 1);
    }

    #[test]
    fn test_parse_non_negative_integer_allows_zero() {
        assert_eq!(parse_non_negative_integer("0", "customers").unwrap(), 0);
        assert_eq!(parse_non_negative_integer("12.7", "customers").unwrap(), 12);
        assert!(parse_non_negative_integer("-1", "customers").is_err());
        assert!(parse_non_negative_integer("lots", "customers").is_err());
    }

    #[test]
    fn test_parse_positive_number() {
        assert_eq!(parse_positive_number("29.90", "price").unwrap(), 29.90);
        assert!(parse_positive_number("", "price").is_err());
        assert!(parse_positive_number("inf", "price").is_err());
    }

    #[test]
    fn test_get_number_or_default_is_total() {
        let args: Map<String, Value> = serde_json::from_value(json!({
            "zero": 0,
            "negative": -2,
            "text": "5",
            "good": 42.5
        }))
        .unwrap();

        assert_eq!(get_number_or_default(&args, "missing", 7.0), 7.0);
        assert_eq!(get_number_or_default(&args, "zero", 7.0), 7.0);
        assert_eq!(get_number_or_default(&args, "negative", 7.0), 7.0);
        assert_eq!(get_number_or_default(&args, "text", 7.0), 7.0);
        assert_eq!(get_number_or_default(&args, "good", 7.0), 42.5);
    }
}
