//! Offline replay of a captured page.
//!
//! A snapshot is a JSON file holding the host page as a [`MemoryDocument`]
//! plus the raw settings store items. Running it goes through the same
//! pipeline as the content script and reports what would be drawn.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::HighlighterApp;
use crate::dom::{MemoryDocument, MemoryNode, MemorySurface};
use crate::error::{Result, SheetlightError};
use crate::locator::{ActiveCellLocator, HostKind};
use crate::render::{FrameInput, RenderSummary};

/// A captured page and its settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub document: MemoryDocument,
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Clock for document retention, milliseconds since the epoch
    #[serde(default)]
    pub now_ms: f64,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SheetlightError::Snapshot(e.to_string()))
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Result of replaying a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReport {
    pub host: HostKind,
    pub sheet_key: String,
    pub frame: FrameInput,
    pub summary: RenderSummary,
    /// Overlay nodes after the cycle, containers first
    pub nodes: Vec<MemoryNode>,
}

/// Load the settings, run one cycle and report it.
pub fn run_snapshot(snapshot: Snapshot) -> Result<SnapshotReport> {
    let Snapshot {
        document,
        settings,
        now_ms,
    } = snapshot;
    if document.href.is_empty() {
        return Err(SheetlightError::Snapshot("document has no href".to_string()));
    }

    let mut app = HighlighterApp::new(document, MemorySurface::new())?;
    app.apply_store_items(&settings, now_ms)?;
    let summary = app.update()?;
    let frame = FrameInput::capture(app.locator());

    Ok(SnapshotReport {
        host: app.locator().host_kind(),
        sheet_key: app.sheet_key(),
        frame,
        summary,
        nodes: app.renderer().surface().nodes().to_vec(),
    })
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

    #[test]
    fn empty_href_is_rejected() {
        let snapshot = Snapshot::from_json(r#"{"document":{"href":""}}"#).unwrap();
        assert!(matches!(run_snapshot(snapshot), Err(SheetlightError::Snapshot(_))));
    }

    #[test]
    fn malformed_json_is_a_snapshot_error() {
        assert!(matches!(
            Snapshot::from_json("{\"document\": 3}"),
            Err(SheetlightError::Snapshot(_))
        ));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let path = std::env::temp_dir().join("sheetlight-no-such-snapshot.json");
        assert!(matches!(Snapshot::from_path(&path), Err(SheetlightError::Io(_))));
    }

    #[test]
    fn page_without_grid_draws_nothing() {
        let snapshot = Snapshot::from_json(
            r##"{"document":{"href":"https://docs.google.com/spreadsheets/d/abc/edit"},
                "settings":{"color":"#00ff00"}}"##,
        )
        .unwrap();
        let report = run_snapshot(snapshot).unwrap();
        assert_eq!(report.host, HostKind::Sheets);
        assert_eq!(report.sheet_key, "abc");
        assert!(report.summary.bands.is_empty());
        assert_eq!(report.summary.headers, 0);
        // Only the two containers exist.
        assert_eq!(report.nodes.len(), 2);
    }
}
