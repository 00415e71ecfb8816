//! Report snapshot encoding.
//!
//! A `ReportData` is serialized to JSON, deflated, then wrapped in URL-safe
//! base64 without padding. Compression happens before the textual transform
//! so the token stays compact enough for URLs and local storage. Decoding has
//! a strict path (`decode`) and a permissive path (`decode_safe`); the strict
//! path never adopts the permissive path's defaulting rules.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::Value;

use crate::error::{CostwiseError, CostwiseResult};
use crate::types::{PricingState, ReportData};

/// Encode a report snapshot into a compact, URL-safe token.
///
/// Deterministic at the business level: encoding the same logical snapshot
/// twice always decodes to identical content (byte-identical compressed
/// output is not promised, since compression internals may vary).
pub fn encode(report: &ReportData) -> CostwiseResult<String> {
    let json = serde_json::to_vec(report)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Strictly decode a token produced by [`encode`].
///
/// Fails on empty input, invalid base64/zlib, and on any payload that does
/// not validate structurally as a `ReportData` after decompression. Garbage
/// is never coerced into a default report.
pub fn decode(encoded: &str) -> CostwiseResult<ReportData> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Err(CostwiseError::Decode("empty input".to_string()));
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(trimmed.as_bytes())
        .map_err(|e| CostwiseError::Decode(format!("invalid base64: {e}")))?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| CostwiseError::Decode(format!("invalid compressed payload: {e}")))?;

    let report: ReportData = serde_json::from_slice(&json)
        .map_err(|e| CostwiseError::Decode(format!("payload is not a report: {e}")))?;

    if report.project_name.trim().is_empty() {
        return Err(CostwiseError::Decode(
            "payload is not a report: projectName is empty".to_string(),
        ));
    }
    check_state_ranges(&report.state)?;

    Ok(report)
}

/// Range invariants on the embedded snapshot. Deserialization alone only
/// proves the shape; a token can still smuggle values the validators would
/// never have admitted.
fn check_state_ranges(state: &PricingState) -> CostwiseResult<()> {
    fn non_negative(n: f64, field: &str) -> CostwiseResult<()> {
        if n.is_finite() && n >= 0.0 {
            Ok(())
        } else {
            Err(CostwiseError::Decode(format!(
                "payload is not a report: {field} must be finite and non-negative (got {n})"
            )))
        }
    }
    fn unit_interval(n: f64, field: &str) -> CostwiseResult<()> {
        if n.is_finite() && (0.0..=1.0).contains(&n) {
            Ok(())
        } else {
            Err(CostwiseError::Decode(format!(
                "payload is not a report: {field} must be within [0, 1] (got {n})"
            )))
        }
    }

    for item in &state.variable_costs {
        non_negative(item.cost_per_unit, "variableCosts.costPerUnit")?;
        non_negative(item.usage_per_customer, "variableCosts.usagePerCustomer")?;
    }
    for item in &state.fixed_costs {
        non_negative(item.monthly_cost, "fixedCosts.monthlyCost")?;
    }
    unit_interval(state.utilization_rate, "utilizationRate")?;
    unit_interval(state.business_type_confidence, "businessTypeConfidence")?;

    Ok(())
}

/// Permissively reconstruct a report from an already-decoded JSON value.
///
/// Known-legacy shapes get defaults (missing `createdAt` becomes the current
/// timestamp, missing `notes` an empty map). Anything that cannot be
/// reconciled into a valid report yields `None`; a fabricated object is never
/// returned. Never errors.
pub fn decode_safe(raw: &Value) -> Option<ReportData> {
    let obj = raw.as_object()?;

    let project_name = obj.get("projectName")?.as_str()?;
    if project_name.trim().is_empty() {
        return None;
    }

    let mut patched = obj.clone();
    if !patched.get("createdAt").is_some_and(Value::is_string) {
        patched.insert(
            "createdAt".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    if !patched.get("notes").is_some_and(Value::is_object) {
        patched.insert("notes".to_string(), Value::Object(Default::default()));
    }

    serde_json::from_value(Value::Object(patched)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PricingState, StakeholderType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_report() -> ReportData {
        let mut notes = std::collections::BTreeMap::new();
        notes.insert(StakeholderType::Investor, "Investment ready".to_string());
        ReportData {
            project_name: "Test Project".to_string(),
            created_at: "2026-08-28T10:30:00+00:00".to_string(),
            state: PricingState {
                customer_count: 100,
                selected_price: 50.0,
                ..PricingState::default()
            },
            notes,
            selected_mockup: None,
        }
    }

    #[test]
    fn test_round_trip_law() {
        let report = sample_report();
        let token = encode(&report).unwrap();
        let decoded = decode(&token).unwrap();

        assert_eq!(decoded, report);
        assert_eq!(decoded.project_name, "Test Project");
        assert_eq!(
            decoded.notes.get(&StakeholderType::Investor).unwrap(),
            "Investment ready"
        );
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode(&sample_report()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(decode(""), Err(CostwiseError::Decode(_))));
        assert!(matches!(decode("   "), Err(CostwiseError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("invalid-data-123").is_err());
        // Valid base64 that is not zlib.
        let not_zlib = URL_SAFE_NO_PAD.encode(b"hello world");
        assert!(decode(&not_zlib).is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        // Structurally valid compression of a non-report document.
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"foo": "bar"}"#).unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert!(matches!(decode(&token), Err(CostwiseError::Decode(_))));
    }

    fn doctored_token(mutate: impl FnOnce(&mut Value)) -> String {
        let mut raw = serde_json::to_value(sample_report()).unwrap();
        mutate(&mut raw);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(serde_json::to_vec(&raw).unwrap().as_slice())
            .unwrap();
        URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn test_decode_rejects_negative_cost_figures() {
        let token = doctored_token(|raw| {
            raw["state"]["fixedCosts"] = json!([
                {"id": "f1", "name": "Hosting", "monthlyCost": -500.0}
            ]);
        });
        let err = decode(&token).unwrap_err();
        assert!(err.to_string().contains("monthlyCost"));
    }

    #[test]
    fn test_decode_rejects_out_of_range_utilization() {
        let token = doctored_token(|raw| {
            raw["state"]["utilizationRate"] = json!(1.5);
        });
        let err = decode(&token).unwrap_err();
        assert!(err.to_string().contains("utilizationRate"));

        let token = doctored_token(|raw| {
            raw["state"]["businessTypeConfidence"] = json!(-0.1);
        });
        assert!(decode(&token).is_err());
    }

    #[test]
    fn test_decode_safe_rejects_non_objects() {
        assert!(decode_safe(&Value::Null).is_none());
        assert!(decode_safe(&json!("text")).is_none());
        assert!(decode_safe(&json!({})).is_none());
    }

    #[test]
    fn test_decode_safe_fills_legacy_defaults() {
        let legacy = json!({
            "projectName": "Test",
            "state": serde_json::to_value(PricingState::default()).unwrap()
        });

        let report = decode_safe(&legacy).unwrap();
        assert_eq!(report.project_name, "Test");
        assert!(!report.created_at.is_empty());
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_decode_safe_keeps_existing_fields() {
        let raw = serde_json::to_value(sample_report()).unwrap();
        let report = decode_safe(&raw).unwrap();
        assert_eq!(report, sample_report());
    }

    #[test]
    fn test_decode_safe_rejects_empty_project_name() {
        let raw = json!({
            "projectName": "  ",
            "state": serde_json::to_value(PricingState::default()).unwrap()
        });
        assert!(decode_safe(&raw).is_none());
    }

    #[test]
    fn test_strict_decode_does_not_default_missing_created_at() {
        // The same legacy shape decode_safe accepts must fail strictly.
        let legacy = json!({
            "projectName": "Test",
            "state": serde_json::to_value(PricingState::default()).unwrap()
        });
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(serde_json::to_vec(&legacy).unwrap().as_slice())
            .unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert!(decode(&token).is_err());
    }
}
