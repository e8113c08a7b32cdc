//! sheetlight - active row/column highlighter for web spreadsheets
//!
//! Runs as a browser extension content script on Google Sheets and Excel for
//! the web, compiled to WebAssembly:
//! - Locates the active cell and selection from the host's own DOM
//! - Merges selection fragments into row and column bands
//! - Draws border-only bands and header accents in its own overlay
//! - Per-document row/column toggles, keyboard shortcuts, Sheets zoom stepping
//!
//! The geometry pipeline (locator, reconciler, renderer) is generic over the
//! DOM, so it runs natively against captured snapshots as well.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { Highlighter } from 'sheetlight';
//! await init();
//! const highlighter = new Highlighter();
//! highlighter.handleCommand('toggleRow');
//! ```

pub mod app;
pub mod commands;
pub mod config;
pub mod dom;
pub mod error;
pub mod locator;
pub mod logging;
pub mod messages;
pub mod reconcile;
pub mod render;
pub mod snapshot;
pub mod types;
pub mod zoom;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use app::web::Highlighter;
pub use app::HighlighterApp;
pub use config::RenderConfig;
pub use error::{Result, SheetlightError};
pub use locator::{ActiveCellLocator, HostKind, Locator};
pub use render::HighlightRenderer;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
