//! Settings parsing, clamping and per-document overrides.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::items;
use serde_json::{json, Value};
use sheetlight::commands::Command;
use sheetlight::config::{
    DocumentTable, Enablement, LoadedSettings, RenderConfig, RenderPolicy, RETENTION_MS,
    STORAGE_KEYS,
};
use sheetlight::render::normalize_color;
use test_case::test_case;

#[test_case(json!(0.5), 0.5 ; "plain number")]
#[test_case(json!("0.3"), 0.3 ; "numeric string")]
#[test_case(json!(0.01), 0.1 ; "below range")]
#[test_case(json!(7), 1.0 ; "above range")]
#[test_case(json!("lots"), 0.8 ; "garbage falls back")]
#[test_case(json!(null), 0.8 ; "null falls back")]
fn opacity_is_parsed_and_clamped(raw: Value, expected: f64) {
    let config = RenderConfig::from_items(&items(json!({ "opacity": raw })));
    assert_eq!(config.opacity, expected);
}

#[test_case(json!(0.1), 0.5 ; "thin")]
#[test_case(json!(2.5), 2.5 ; "in range")]
#[test_case(json!(12), 5.0 ; "thick")]
fn line_size_is_clamped(raw: Value, expected: f64) {
    let config = RenderConfig::from_items(&items(json!({ "lineSize": raw })));
    assert_eq!(config.line_thickness, expected);
}

#[test_case("#ABCDEF", Some("#abcdef") ; "upper case")]
#[test_case("#f0a", Some("#ff00aa") ; "short form")]
#[test_case("0e65eb", Some("#0e65eb") ; "no hash")]
#[test_case("rgb(1,2,3)", None ; "functional notation")]
#[test_case("#12345", None ; "five digits")]
fn colors_normalize(raw: &str, expected: Option<&str>) {
    assert_eq!(normalize_color(raw).as_deref(), expected);
}

#[test_case("fullBand", RenderPolicy::FullBand ; "full band")]
#[test_case("segmented", RenderPolicy::Segmented ; "segmented")]
#[test_case("diagonal", RenderPolicy::FullBand ; "unknown policy")]
fn render_policy_is_parsed(raw: &str, expected: RenderPolicy) {
    let config = RenderConfig::from_items(&items(json!({ "renderPolicy": raw })));
    assert_eq!(config.render_policy, expected);
}

#[test]
fn config_round_trips_through_store_keys() {
    let config = RenderConfig {
        background_color: "#123456".to_string(),
        opacity: 0.6,
        line_thickness: 2.0,
        row_enabled: false,
        column_enabled: true,
        header_col_scale: 1.0,
        header_row_scale: 2.0,
        render_policy: RenderPolicy::Segmented,
        emphasize_intersection: true,
    };
    let stored = items(serde_json::to_value(&config).unwrap());
    assert!(stored.keys().all(|key| STORAGE_KEYS.contains(&key.as_str())));
    assert_eq!(RenderConfig::from_items(&stored), config);
}

#[test]
fn non_finite_numbers_reset_to_defaults() {
    let config = RenderConfig {
        opacity: f64::NAN,
        header_row_scale: f64::INFINITY,
        background_color: "blue".to_string(),
        ..RenderConfig::default()
    }
    .clamped();
    assert_eq!(config, RenderConfig::default());
}

#[test]
fn malformed_document_entries_are_skipped() {
    let table = DocumentTable::from_item(Some(&json!({
        "good": { "row": false, "updatedAt": 5.0 },
        "bad": "yes",
        "worse": { "row": "maybe" }
    })));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("good").unwrap().row, Some(false));
    assert!(DocumentTable::from_item(Some(&json!([1, 2]))).is_empty());
    assert!(DocumentTable::from_item(None).is_empty());
}

#[test]
fn partial_override_keeps_global_for_the_other_axis() {
    let table = DocumentTable::from_item(Some(&json!({
        "doc": { "column": false, "updatedAt": 0.0 }
    })));
    let global = Enablement {
        row: false,
        column: true,
    };
    assert_eq!(
        table.resolve("doc", global),
        Enablement {
            row: false,
            column: false,
        }
    );
    assert_eq!(table.resolve("elsewhere", global), global);
}

#[test]
fn retention_boundary_is_inclusive() {
    let now = 10.0 * RETENTION_MS;
    let mut table = DocumentTable::from_item(Some(&json!({
        "edge": { "row": true, "updatedAt": now - RETENTION_MS },
        "gone": { "row": true, "updatedAt": now - RETENTION_MS - 1.0 }
    })));
    assert_eq!(table.prune(now), 1);
    assert!(table.get("edge").is_some());
}

#[test]
fn loaded_settings_apply_and_prune() {
    let now = 2.0 * RETENTION_MS;
    let loaded = LoadedSettings::load(
        &items(json!({
            "row": true,
            "column": true,
            "documents": {
                "doc": { "row": false, "updatedAt": now },
                "old": { "row": false, "updatedAt": 0.0 }
            }
        })),
        "doc",
        now,
    );
    assert!(loaded.pruned);
    assert_eq!(loaded.documents.len(), 1);
    assert!(!loaded.config.row_enabled);
    assert!(loaded.config.column_enabled);
}

#[test_case("toggleRow", Command::ToggleRow ; "toggle row")]
#[test_case("toggleColumn", Command::ToggleColumn ; "toggle column")]
#[test_case("toggleBoth", Command::ToggleBoth ; "toggle both")]
#[test_case("cycleZoomOut", Command::CycleZoomOut ; "zoom out")]
#[test_case("cycleZoomIn", Command::CycleZoomIn ; "zoom in")]
fn command_names_parse(name: &str, expected: Command) {
    assert_eq!(name.parse::<Command>().unwrap(), expected);
    assert_eq!(expected.to_string(), name);
}

#[test]
fn unknown_command_is_an_error() {
    assert!("toggleDiagonal".parse::<Command>().is_err());
}
