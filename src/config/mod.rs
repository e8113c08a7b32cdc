//! Render configuration read from the extension's settings store.
//!
//! The store is a flat key-value map written by the popup and the
//! background script. Every read goes through [`RenderConfig::from_items`],
//! which accepts whatever the store holds, substitutes defaults for missing
//! or malformed values and clamps numbers into range. The resulting value is
//! handed to the renderer each cycle and never mutated by it.

mod documents;

pub use documents::{DocumentSettings, DocumentTable, RETENTION_MS};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::colors::{normalize_color, CssColor, DEFAULT_COLOR};

/// Keys requested from the settings store on every load.
pub const STORAGE_KEYS: [&str; 10] = [
    "color",
    "opacity",
    "row",
    "column",
    "lineSize",
    "headerColScale",
    "headerRowScale",
    "renderPolicy",
    "intersection",
    "documents",
];

pub const OPACITY_RANGE: (f64, f64) = (0.1, 1.0);
pub const LINE_SIZE_RANGE: (f64, f64) = (0.5, 5.0);
pub const HEADER_SCALE_RANGE: (f64, f64) = (0.5, 4.0);

/// How the active row and column are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderPolicy {
    /// One band per merged row/column spanning the whole sheet
    #[default]
    FullBand,
    /// Bands split around a single active cell
    Segmented,
}

/// Which bands are switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enablement {
    pub row: bool,
    pub column: bool,
}

impl Default for Enablement {
    fn default() -> Self {
        Self {
            row: true,
            column: true,
        }
    }
}

/// Everything the renderer needs to style a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    #[serde(rename = "color")]
    pub background_color: CssColor,

    pub opacity: f64,

    #[serde(rename = "lineSize")]
    pub line_thickness: f64,

    #[serde(rename = "row")]
    pub row_enabled: bool,

    #[serde(rename = "column")]
    pub column_enabled: bool,

    #[serde(rename = "headerColScale")]
    pub header_col_scale: f64,

    #[serde(rename = "headerRowScale")]
    pub header_row_scale: f64,

    #[serde(rename = "renderPolicy")]
    pub render_policy: RenderPolicy,

    /// Outline the active cell where the segmented bands cross
    #[serde(rename = "intersection")]
    pub emphasize_intersection: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_COLOR.to_string(),
            opacity: 0.8,
            line_thickness: 1.75,
            row_enabled: true,
            column_enabled: true,
            header_col_scale: 0.9,
            header_row_scale: 1.15,
            render_policy: RenderPolicy::FullBand,
            emphasize_intersection: false,
        }
    }
}

fn clamp_or(value: f64, (min, max): (f64, f64), default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// A number, or a string holding one (older popups stored `"0.8"`).
fn number_item(items: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = items.get(key)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    if number.is_none() {
        tracing::debug!(key, %value, "ignoring malformed number setting");
    }
    number
}

fn bool_item(items: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = items.get(key)?;
    let flag = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse::<bool>().ok(),
        _ => None,
    };
    if flag.is_none() {
        tracing::debug!(key, %value, "ignoring malformed boolean setting");
    }
    flag
}

fn string_item<'a>(items: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    let value = items.get(key)?;
    let s = value.as_str();
    if s.is_none() {
        tracing::debug!(key, %value, "ignoring non-string setting");
    }
    s
}

impl RenderConfig {
    /// Build a config from raw store items, key by key.
    ///
    /// A malformed value only resets its own key; the rest of the map still
    /// applies.
    pub fn from_items(items: &Map<String, Value>) -> Self {
        let defaults = Self::default();

        let background_color = string_item(items, "color")
            .and_then(|raw| {
                let color = normalize_color(raw);
                if color.is_none() {
                    tracing::debug!(raw, "ignoring malformed color");
                }
                color
            })
            .unwrap_or_else(|| defaults.background_color.clone());

        let render_policy = string_item(items, "renderPolicy")
            .and_then(|raw| {
                let policy = serde_json::from_value(Value::String(raw.to_owned())).ok();
                if policy.is_none() {
                    tracing::debug!(raw, "unknown render policy");
                }
                policy
            })
            .unwrap_or(defaults.render_policy);

        Self {
            background_color,
            opacity: number_item(items, "opacity").unwrap_or(defaults.opacity),
            line_thickness: number_item(items, "lineSize").unwrap_or(defaults.line_thickness),
            row_enabled: bool_item(items, "row").unwrap_or(defaults.row_enabled),
            column_enabled: bool_item(items, "column").unwrap_or(defaults.column_enabled),
            header_col_scale: number_item(items, "headerColScale")
                .unwrap_or(defaults.header_col_scale),
            header_row_scale: number_item(items, "headerRowScale")
                .unwrap_or(defaults.header_row_scale),
            render_policy,
            emphasize_intersection: bool_item(items, "intersection")
                .unwrap_or(defaults.emphasize_intersection),
        }
        .clamped()
    }

    /// Force every number into its allowed range; non-finite numbers reset to the default.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        let defaults = Self::default();
        self.opacity = clamp_or(self.opacity, OPACITY_RANGE, defaults.opacity);
        self.line_thickness = clamp_or(self.line_thickness, LINE_SIZE_RANGE, defaults.line_thickness);
        self.header_col_scale =
            clamp_or(self.header_col_scale, HEADER_SCALE_RANGE, defaults.header_col_scale);
        self.header_row_scale =
            clamp_or(self.header_row_scale, HEADER_SCALE_RANGE, defaults.header_row_scale);
        if normalize_color(&self.background_color).is_none() {
            self.background_color = defaults.background_color;
        }
        self
    }

    pub fn enablement(&self) -> Enablement {
        Enablement {
            row: self.row_enabled,
            column: self.column_enabled,
        }
    }

    #[must_use]
    pub fn with_enablement(mut self, enablement: Enablement) -> Self {
        self.row_enabled = enablement.row;
        self.column_enabled = enablement.column;
        self
    }
}

/// The config for one document plus the per-document table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub config: RenderConfig,
    pub documents: DocumentTable,
    /// True when stale document entries were dropped and the table should be written back
    pub pruned: bool,
}

impl LoadedSettings {
    /// Read store items for the document `sheet_key` at time `now_ms`.
    ///
    /// Per-document row/column overrides win over the global flags.
    pub fn load(items: &Map<String, Value>, sheet_key: &str, now_ms: f64) -> Self {
        let config = RenderConfig::from_items(items);
        let mut documents = DocumentTable::from_item(items.get("documents"));
        let pruned = documents.prune(now_ms) > 0;
        let enablement = documents.resolve(sheet_key, config.enablement());
        Self {
            config: config.with_enablement(enablement),
            documents,
            pruned,
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

    fn items(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn empty_store_gives_defaults() {
        assert_eq!(RenderConfig::from_items(&Map::new()), RenderConfig::default());
    }

    #[test]
    fn one_bad_key_keeps_the_others() {
        let config = RenderConfig::from_items(&items(json!({
            "color": "not a color",
            "opacity": "0.5",
            "row": false,
        })));
        assert_eq!(config.background_color, DEFAULT_COLOR);
        assert_eq!(config.opacity, 0.5);
        assert!(!config.row_enabled);
    }

    #[test]
    fn serde_round_trip_uses_store_keys() {
        let config = RenderConfig::default();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["lineSize"], json!(1.75));
        assert_eq!(value["renderPolicy"], json!("fullBand"));
        let back: RenderConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn non_finite_resets_to_default() {
        let config = RenderConfig {
            opacity: f64::NAN,
            ..RenderConfig::default()
        }
        .clamped();
        assert_eq!(config.opacity, 0.8);
    }
}
