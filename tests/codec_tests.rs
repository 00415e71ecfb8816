//! Report codec and store integration tests
//!
//! Round-trip law, token transport safety, the strict/permissive decode
//! split, and short-id store persistence.

use costwise::report::{self, ReportStore, ShareUrlKind, ShareUrlShape};
use costwise::types::{PricingState, ReportData, StakeholderType};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn sample_report() -> ReportData {
    let state = PricingState {
        customer_count: 100,
        selected_price: 29.0,
        utilization_rate: 0.8,
        ..PricingState::default()
    };

    let mut notes = std::collections::BTreeMap::new();
    notes.insert(
        StakeholderType::Investor,
        "Unit economics hold at 100 customers.".to_string(),
    );

    ReportData {
        project_name: "Acme Pricing".to_string(),
        created_at: "2026-08-28T00:00:00+00:00".to_string(),
        state,
        notes,
        selected_mockup: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CODEC TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_round_trip_preserves_report() {
    let report = sample_report();
    let token = report::encode(&report).unwrap();
    let decoded = report::decode(&token).unwrap();
    assert_eq!(decoded, report);
}

#[test]
fn test_token_is_url_transport_safe() {
    let token = report::encode(&sample_report()).unwrap();
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn test_decode_rejects_malformed_input() {
    assert!(report::decode("").is_err());
    assert!(report::decode("   ").is_err());
    assert!(report::decode("not base64 at all!!").is_err());
    // Valid base64 but not zlib data.
    assert!(report::decode("aGVsbG8gd29ybGQ").is_err());
}

#[test]
fn test_decode_safe_patches_missing_fields() {
    let doc = json!({
        "projectName": "Bare Minimum",
        "state": {}
    });
    let report = report::decode_safe(&doc).unwrap();
    assert_eq!(report.project_name, "Bare Minimum");
    assert!(!report.created_at.is_empty());
    assert!(report.notes.is_empty());
}

#[test]
fn test_decode_safe_rejects_unnamed_project() {
    assert!(report::decode_safe(&json!({"state": {}})).is_none());
    assert!(report::decode_safe(&json!({"projectName": "  ", "state": {}})).is_none());
    assert!(report::decode_safe(&json!("not an object")).is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARE URL TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inline_share_url_round_trips() {
    let report = sample_report();
    let url = report::create_shareable_url(
        "https://costwise.app",
        &report,
        StakeholderType::Investor,
        ShareUrlShape::Inline,
    )
    .unwrap();

    match report::classify_share_url(&url).unwrap() {
        ShareUrlKind::Inline { token } => {
            assert_eq!(report::decode(&token).unwrap(), report);
        }
        other => panic!("expected inline, got {other:?}"),
    }
}

#[test]
fn test_short_id_share_url_resolves_via_store() {
    let report = sample_report();
    let store = ReportStore::new();
    let id = store.store(&report).unwrap();

    let url = report::create_shareable_url(
        "https://costwise.app",
        &report,
        StakeholderType::Team,
        ShareUrlShape::ShortId(id.clone()),
    )
    .unwrap();

    match report::classify_share_url(&url).unwrap() {
        ShareUrlKind::ShortId { id: extracted } => {
            assert_eq!(extracted, id);
            assert_eq!(store.retrieve(&extracted).unwrap(), report);
        }
        other => panic!("expected short id, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORT STORE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_store_ids_are_short_and_unique() {
    let store = ReportStore::new();
    let report = sample_report();

    let a = store.store(&report).unwrap();
    let b = store.store(&report).unwrap();
    assert_eq!(a.len(), 8);
    assert_eq!(b.len(), 8);
    assert_ne!(a, b, "Each store call draws a fresh id");
    assert_eq!(store.len(), 2);
}

#[test]
fn test_store_unknown_id_is_none() {
    let store = ReportStore::new();
    assert!(store.retrieve("missing1").is_none());
}

#[test]
fn test_store_persists_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reports.json");
    let report = sample_report();

    let id = {
        let store = ReportStore::with_path(path.clone());
        store.store(&report).unwrap()
    };

    let reopened = ReportStore::with_path(path);
    assert_eq!(reopened.retrieve(&id).unwrap(), report);
}
