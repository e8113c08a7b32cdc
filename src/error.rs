//! Structured error types for sheetlight.
//!
//! Only the glue around the geometry pipeline is fallible: JS calls, the
//! settings store, runtime messages and CLI snapshots. Missing DOM anchors
//! are not errors; locators return empty results for those.

/// All errors that can occur outside the geometry pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SheetlightError {
    /// A DOM call was rejected or returned an unexpected node type.
    #[error("DOM: {0}")]
    Dom(String),

    /// The settings store rejected a read/write or returned a non-object.
    #[error("Settings store: {0}")]
    Storage(String),

    /// A runtime message could not be understood.
    #[error("Message: {0}")]
    Message(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Serde(#[from] serde_json::Error),

    /// A CLI snapshot is malformed.
    #[error("Snapshot: {0}")]
    Snapshot(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetlightError>;

#[cfg(target_arch = "wasm32")]
impl SheetlightError {
    /// Wrap a thrown JS value as a DOM error.
    pub fn dom(value: &wasm_bindgen::JsValue) -> Self {
        Self::Dom(describe_js(value))
    }

    /// Wrap a thrown JS value as a settings store error.
    pub fn storage(value: &wasm_bindgen::JsValue) -> Self {
        Self::Storage(describe_js(value))
    }
}

#[cfg(target_arch = "wasm32")]
fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(target_arch = "wasm32")]
impl From<SheetlightError> for wasm_bindgen::JsValue {
    fn from(e: SheetlightError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for SheetlightError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Message(e.to_string())
    }
}
