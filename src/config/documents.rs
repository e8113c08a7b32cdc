//! Per-document row/column overrides, keyed by sheet key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Enablement;

/// Entries untouched for longer than this are dropped on load (30 days).
pub const RETENTION_MS: f64 = 30.0 * 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<bool>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub updated_at: f64,
}

/// The `documents` store item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTable {
    entries: BTreeMap<String, DocumentSettings>,
}

impl DocumentTable {
    /// Parse the raw store item. Entries that do not parse are skipped.
    pub fn from_item(item: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = item else {
            if let Some(other) = item {
                tracing::debug!(%other, "ignoring malformed documents table");
            }
            return Self::default();
        };
        let entries = map
            .iter()
            .filter_map(|(key, value)| {
                match serde_json::from_value::<DocumentSettings>(value.clone()) {
                    Ok(settings) => Some((key.clone(), settings)),
                    Err(err) => {
                        tracing::debug!(key = key.as_str(), %err, "ignoring malformed document entry");
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, sheet_key: &str) -> Option<&DocumentSettings> {
        self.entries.get(sheet_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries older than [`RETENTION_MS`]; returns how many were dropped.
    pub fn prune(&mut self, now_ms: f64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, settings| now_ms - settings.updated_at <= RETENTION_MS);
        before - self.entries.len()
    }

    /// Global enablement with this document's overrides applied.
    pub fn resolve(&self, sheet_key: &str, global: Enablement) -> Enablement {
        match self.entries.get(sheet_key) {
            Some(settings) => Enablement {
                row: settings.row.unwrap_or(global.row),
                column: settings.column.unwrap_or(global.column),
            },
            None => global,
        }
    }

    /// Remember `enablement` for `sheet_key` as of `now_ms`.
    pub fn record(&mut self, sheet_key: &str, enablement: Enablement, now_ms: f64) {
        self.entries.insert(
            sheet_key.to_owned(),
            DocumentSettings {
                row: Some(enablement.row),
                column: Some(enablement.column),
                updated_at: now_ms,
            },
        );
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
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

    const DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

    #[test]
    fn prune_drops_entries_past_retention() {
        let item = json!({
            "fresh": {"row": false, "updatedAt": 95.0 * DAY},
            "stale": {"row": true, "updatedAt": 60.0 * DAY},
        });
        let mut table = DocumentTable::from_item(Some(&item));
        assert_eq!(table.prune(100.0 * DAY), 1);
        assert!(table.get("fresh").is_some());
        assert!(table.get("stale").is_none());
    }

    #[test]
    fn overrides_are_per_flag() {
        let item = json!({"doc": {"column": false, "updatedAt": 0}});
        let table = DocumentTable::from_item(Some(&item));
        let resolved = table.resolve("doc", Enablement::default());
        assert_eq!(resolved, Enablement { row: true, column: false });
        assert_eq!(table.resolve("other", Enablement::default()), Enablement::default());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let item = json!({"good": {"row": true}, "bad": "yes"});
        let table = DocumentTable::from_item(Some(&item));
        assert_eq!(table.len(), 1);
        assert!(DocumentTable::from_item(Some(&json!([1, 2]))).is_empty());
    }

    #[test]
    fn record_writes_store_shape() {
        let mut table = DocumentTable::default();
        table.record("k", Enablement { row: false, column: true }, 5.0);
        assert_eq!(
            table.to_value(),
            json!({"k": {"row": false, "column": true, "updatedAt": 5.0}})
        );
    }
}
