//! Update scheduler tests: store loading, shortcut commands and runtime
//! messages, driven the way the content script drives them.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{items, PageBuilder};
use serde_json::json;
use sheetlight::app::{CommandEffect, HighlighterApp, MessageEffect};
use sheetlight::commands::Command;
use sheetlight::config::RETENTION_MS;
use sheetlight::dom::{MemoryDocument, MemorySurface};
use sheetlight::messages::{RuntimeMessage, SheetKeyResponse};
use sheetlight::zoom::ZoomDirection;

type App = HighlighterApp<MemoryDocument, MemorySurface>;

const NOW: f64 = 1_700_000_000_000.0;

fn sheets_app() -> App {
    HighlighterApp::new(
        PageBuilder::sheets().active_cell(2, 2).build(),
        MemorySurface::new(),
    )
    .unwrap()
}

fn excel_app() -> App {
    HighlighterApp::new(
        PageBuilder::excel().active_cell(2, 2).build(),
        MemorySurface::new(),
    )
    .unwrap()
}

#[test]
fn store_items_apply_with_document_override() {
    let mut app = sheets_app();
    let write_back = app
        .apply_store_items(
            &items(json!({
                "color": "#0E65EB",
                "lineSize": 3,
                "row": true,
                "documents": {
                    "sheet-1": { "row": false, "updatedAt": NOW },
                    "other": { "column": false, "updatedAt": NOW }
                }
            })),
            NOW,
        )
        .unwrap();

    assert_eq!(write_back, None);
    assert_eq!(app.config().background_color, "#0e65eb");
    assert_eq!(app.config().line_thickness, 3.0);
    assert!(!app.config().row_enabled);
    assert!(app.config().column_enabled);

    let summary = app.update().unwrap();
    assert_eq!(summary.bands.len(), 1);
}

#[test]
fn stale_documents_are_pruned_and_returned_for_write_back() {
    let mut app = sheets_app();
    let stale = NOW - RETENTION_MS - 1.0;
    let write_back = app
        .apply_store_items(
            &items(json!({
                "documents": {
                    "sheet-1": { "row": false, "updatedAt": stale },
                    "fresh": { "row": false, "updatedAt": NOW }
                }
            })),
            NOW,
        )
        .unwrap()
        .unwrap();

    assert!(write_back.get("sheet-1").is_none());
    assert!(write_back.get("fresh").is_some());
    // The stale override no longer applies.
    assert!(app.config().row_enabled);
}

#[test]
fn toggle_row_persists_and_broadcasts() {
    let mut app = sheets_app();
    let effect = app.handle_command(Command::ToggleRow, NOW).unwrap();

    let (stored, broadcast) = match effect {
        CommandEffect::Persist { items, broadcast } => (items, broadcast),
        other => panic!("expected a persist effect, got {other:?}"),
    };
    assert_eq!(stored["row"], json!(false));
    assert_eq!(stored["column"], json!(true));
    assert_eq!(stored["documents"]["sheet-1"]["row"], json!(false));
    assert_eq!(stored["documents"]["sheet-1"]["updatedAt"], json!(NOW));
    assert_eq!(
        broadcast,
        RuntimeMessage::Commands {
            row: false,
            column: true,
        }
    );
    assert!(!app.config().row_enabled);
}

#[test]
fn toggle_both_turns_everything_off_then_on() {
    let mut app = sheets_app();
    app.handle_command(Command::ToggleBoth, NOW).unwrap();
    assert!(!app.config().row_enabled && !app.config().column_enabled);
    assert!(app.update().unwrap().bands.is_empty());

    app.handle_command(Command::ToggleBoth, NOW).unwrap();
    assert!(app.config().row_enabled && app.config().column_enabled);
    assert_eq!(app.update().unwrap().bands.len(), 2);
}

#[test]
fn zoom_commands_only_apply_to_sheets() {
    let mut sheets = sheets_app();
    assert_eq!(
        sheets.handle_command(Command::CycleZoomIn, NOW).unwrap(),
        CommandEffect::Zoom(ZoomDirection::In)
    );
    let mut excel = excel_app();
    assert_eq!(
        excel.handle_command(Command::CycleZoomOut, NOW).unwrap(),
        CommandEffect::None
    );
}

#[test]
fn sheet_key_request_gets_a_reply() {
    let mut app = excel_app();
    assert_eq!(
        app.handle_message(RuntimeMessage::GetSheetKey, NOW).unwrap(),
        MessageEffect::Reply(SheetKeyResponse {
            sheet_key: "ABC-123".to_string(),
        })
    );
}

#[test]
fn settings_update_without_payload_asks_for_reload() {
    let mut app = sheets_app();
    assert_eq!(
        app.handle_message(RuntimeMessage::SettingsUpdated { settings: None }, NOW)
            .unwrap(),
        MessageEffect::Reload
    );
}

#[test]
fn inline_settings_merge_over_current_config() {
    let mut app = sheets_app();
    app.handle_command(Command::ToggleColumn, NOW).unwrap();

    let message = RuntimeMessage::from_value(json!({
        "type": "settingsUpdated",
        "settings": { "color": "#00f", "opacity": 0.5 }
    }))
    .unwrap();
    assert_eq!(app.handle_message(message, NOW).unwrap(), MessageEffect::Redrawn);

    assert_eq!(app.config().background_color, "#0000ff");
    assert_eq!(app.config().opacity, 0.5);
    // Keys not in the payload keep their current values.
    assert!(!app.config().column_enabled);
}

#[test]
fn commands_broadcast_updates_enablement() {
    let mut app = sheets_app();
    let message = RuntimeMessage::from_value(json!({
        "type": "commands",
        "row": false,
        "column": false
    }))
    .unwrap();
    let stored = match app.handle_message(message, NOW).unwrap() {
        MessageEffect::Persist(items) => items,
        other => panic!("expected a persist effect, got {other:?}"),
    };
    assert!(!app.config().row_enabled);
    assert!(!app.config().column_enabled);
    assert_eq!(stored["row"], json!(false));
    assert_eq!(stored["documents"]["sheet-1"]["column"], json!(false));
    assert_eq!(stored["documents"]["sheet-1"]["updatedAt"], json!(NOW));
}

#[test]
fn commands_broadcast_survives_a_store_reload() {
    let mut app = sheets_app();
    app.apply_store_items(
        &items(json!({
            "row": true,
            "documents": { "sheet-1": { "row": true, "updatedAt": NOW - 1000.0 } }
        })),
        NOW,
    )
    .unwrap();
    assert!(app.config().row_enabled);

    let stored = match app
        .handle_message(RuntimeMessage::Commands { row: false, column: true }, NOW)
        .unwrap()
    {
        MessageEffect::Persist(items) => items,
        other => panic!("expected a persist effect, got {other:?}"),
    };
    // The store now holds what the message wrote; reloading it keeps the toggle.
    app.apply_store_items(&stored, NOW).unwrap();
    assert!(!app.config().row_enabled);
    assert!(app.config().column_enabled);
}

#[test]
fn forwarded_zoom_message_is_ignored_off_sheets() {
    let mut excel = excel_app();
    let message = RuntimeMessage::Zoom {
        direction: ZoomDirection::Out,
    };
    assert_eq!(
        excel.handle_message(message.clone(), NOW).unwrap(),
        MessageEffect::Redrawn
    );
    let mut sheets = sheets_app();
    assert_eq!(
        sheets.handle_message(message, NOW).unwrap(),
        MessageEffect::Zoom(ZoomDirection::Out)
    );
}

#[test]
fn unknown_messages_are_dropped() {
    assert_eq!(
        RuntimeMessage::parse_lenient(json!({ "type": "somethingElse" })),
        None
    );
    assert_eq!(RuntimeMessage::parse_lenient(json!("ping")), None);
}
