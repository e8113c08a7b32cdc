//! Runtime messages exchanged with the popup and background script.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::zoom::ZoomDirection;

/// Messages the content script understands, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeMessage {
    /// Settings changed; reload, or apply the inline copy when present.
    SettingsUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settings: Option<Map<String, Value>>,
    },
    /// Enablement broadcast after a shortcut toggle.
    Commands { row: bool, column: bool },
    /// Ask for the current document's key.
    GetSheetKey,
    /// Forwarded zoom command.
    Zoom { direction: ZoomDirection },
}

/// Reply to [`RuntimeMessage::GetSheetKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetKeyResponse {
    pub sheet_key: String,
}

impl RuntimeMessage {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Unknown message types are not errors; other extensions share the channel.
    pub fn parse_lenient(value: Value) -> Option<Self> {
        match Self::from_value(value) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring runtime message");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wire_shapes() {
        assert_eq!(
            RuntimeMessage::from_value(json!({"type": "settingsUpdated"})).unwrap(),
            RuntimeMessage::SettingsUpdated { settings: None }
        );
        assert_eq!(
            RuntimeMessage::from_value(json!({"type": "commands", "row": true, "column": false}))
                .unwrap(),
            RuntimeMessage::Commands {
                row: true,
                column: false
            }
        );
        assert_eq!(
            RuntimeMessage::from_value(json!({"type": "getSheetKey"})).unwrap(),
            RuntimeMessage::GetSheetKey
        );
        assert_eq!(
            RuntimeMessage::from_value(json!({"type": "zoom", "direction": "out"})).unwrap(),
            RuntimeMessage::Zoom {
                direction: ZoomDirection::Out
            }
        );
    }

    #[test]
    fn inline_settings_are_kept() {
        let message = RuntimeMessage::from_value(json!({
            "type": "settingsUpdated",
            "settings": {"color": "#000", "opacity": 0.3}
        }))
        .unwrap();
        let RuntimeMessage::SettingsUpdated { settings: Some(settings) } = message else {
            panic!("expected inline settings");
        };
        assert_eq!(settings["opacity"], json!(0.3));
    }

    #[test]
    fn foreign_messages_are_ignored() {
        assert!(RuntimeMessage::parse_lenient(json!({"type": "somethingElse"})).is_none());
        assert!(RuntimeMessage::parse_lenient(json!("hello")).is_none());
    }

    #[test]
    fn sheet_key_response_shape() {
        let value = serde_json::to_value(SheetKeyResponse {
            sheet_key: "abc".into(),
        })
        .unwrap();
        assert_eq!(value, json!({"sheetKey": "abc"}));
    }
}
