//! Stepped zoom for Google Sheets.
//!
//! Sheets exposes no zoom API to content scripts, so zooming is driven
//! through the host's own "Search the menus" box: Alt+/ opens it, the text
//! `Zoom: N%` selects the menu entry and Enter applies it. This module holds
//! the pure parts (level math, label parsing, debounce bookkeeping, key
//! codes); [`driver`] sends the events in the browser.

#[cfg(target_arch = "wasm32")]
pub mod driver;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Zoom levels offered by the Sheets toolbar, in percent.
pub const ZOOM_LEVELS: [u32; 7] = [50, 75, 90, 100, 125, 150, 200];

/// Assumed zoom when the toolbar label cannot be read.
pub const DEFAULT_ZOOM: u32 = 100;

/// Quiet period before accumulated presses are applied.
pub const DEBOUNCE_MS: u32 = 200;
/// Wait for the menu search box after Alt+/.
pub const MENU_SEARCH_DELAY_MS: u32 = 280;
/// Wait between filling the search box and pressing Enter.
pub const ENTER_DELAY_MS: u32 = 70;
/// Wait for the menu to close after Enter.
pub const AFTER_ENTER_MS: u32 = 120;
/// Wait before the second search for the menu box.
pub const SEARCH_RETRY_MS: u32 = 200;

/// Toolbar option carrying the current zoom in its `aria-label`.
pub const ZOOM_OPTION_SELECTOR: &str = r#"[role="option"][aria-label*="Zoom list"]"#;

/// Candidate selectors for the menu search input, most specific first.
pub const MENU_SEARCH_SELECTORS: [&str; 8] = [
    "input.docs-omnibox-input",
    r#"input[aria-label="Menus"]"#,
    r#"input[placeholder="Menus"]"#,
    r#"input[aria-label*="Search"]"#,
    r#"input[placeholder*="Search"]"#,
    r#"input[placeholder*="earch"]"#,
    "input.jfk-textinput",
    r#"input[type="text"]"#,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

fn label_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)(\d+)\s*%\s*selected").ok())
        .as_ref()
}

/// Current zoom from a label like `"Zoom list. 125% selected."`.
pub fn parse_zoom_label(label: &str) -> u32 {
    label_pattern()
        .and_then(|pattern| pattern.captures(label))
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .filter(|&percent| percent > 0)
        .unwrap_or(DEFAULT_ZOOM)
}

/// Level reached from `current` after `steps` presses (negative zooms out).
///
/// A `current` that is not one of the levels starts from the first level
/// above it, or the bottom level when it is above them all. The result is
/// clamped to the level range.
pub fn target_by_steps(current: u32, steps: i32) -> u32 {
    let last = ZOOM_LEVELS.len().saturating_sub(1);
    let base = ZOOM_LEVELS
        .iter()
        .position(|&level| level >= current)
        .unwrap_or(0);
    let index = i64::try_from(base)
        .unwrap_or(0)
        .saturating_add(i64::from(steps))
        .clamp(0, i64::try_from(last).unwrap_or(0));
    usize::try_from(index)
        .ok()
        .and_then(|index| ZOOM_LEVELS.get(index).copied())
        .unwrap_or(DEFAULT_ZOOM)
}

/// Presses waiting for the debounce timer.
///
/// A press in one direction discards pending presses in the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingZoom {
    zoom_in: u32,
    zoom_out: u32,
}

impl PendingZoom {
    pub fn press(&mut self, direction: ZoomDirection) {
        match direction {
            ZoomDirection::In => {
                self.zoom_in = self.zoom_in.saturating_add(1);
                self.zoom_out = 0;
            }
            ZoomDirection::Out => {
                self.zoom_out = self.zoom_out.saturating_add(1);
                self.zoom_in = 0;
            }
        }
    }

    /// Signed step count to apply, clearing both counters.
    pub fn take(&mut self) -> Option<i32> {
        let steps = if self.zoom_out > 0 {
            Some(-i32::try_from(self.zoom_out).unwrap_or(i32::MAX))
        } else if self.zoom_in > 0 {
            Some(i32::try_from(self.zoom_in).unwrap_or(i32::MAX))
        } else {
            None
        };
        *self = Self::default();
        steps
    }
}

/// Text typed into the menu search box.
pub fn search_text(target: u32) -> String {
    format!("Zoom: {target}%")
}

/// One synthetic key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: String,
    pub code: String,
    /// Legacy `keyCode`/`which` value the host still reads
    pub key_code: u32,
    pub alt: bool,
}

impl KeyStroke {
    pub fn enter() -> Self {
        Self {
            key: "Enter".to_string(),
            code: "Enter".to_string(),
            key_code: 13,
            alt: false,
        }
    }

    /// Alt+/ opens the menu search.
    pub fn open_menu_search() -> Self {
        Self {
            key: "/".to_string(),
            code: "Slash".to_string(),
            key_code: u32::from('/'),
            alt: true,
        }
    }

    pub fn from_char(ch: char) -> Self {
        let code = match ch {
            ' ' => "Space".to_string(),
            '%' => "Digit5".to_string(),
            ':' => "Semicolon".to_string(),
            '/' => "Slash".to_string(),
            d if d.is_ascii_digit() => format!("Digit{d}"),
            c => format!("Key{}", c.to_ascii_uppercase()),
        };
        Self {
            key: ch.to_string(),
            code,
            key_code: u32::from(ch),
            alt: false,
        }
    }
}

/// Keystrokes that type `text` and press Enter, used when no search box is found.
pub fn typing_sequence(text: &str) -> Vec<KeyStroke> {
    text.chars()
        .map(KeyStroke::from_char)
        .chain(std::iter::once(KeyStroke::enter()))
        .collect()
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
    fn reads_toolbar_label() {
        assert_eq!(parse_zoom_label("Zoom list. 125% selected."), 125);
        assert_eq!(parse_zoom_label("Zoom list. 90 % Selected"), 90);
        assert_eq!(parse_zoom_label("Zoom list"), DEFAULT_ZOOM);
        assert_eq!(parse_zoom_label("Zoom list. 0% selected."), DEFAULT_ZOOM);
    }

    #[test]
    fn steps_walk_the_level_list() {
        assert_eq!(target_by_steps(100, 1), 125);
        assert_eq!(target_by_steps(100, -2), 75);
        assert_eq!(target_by_steps(100, 10), 200);
        assert_eq!(target_by_steps(50, -1), 50);
    }

    #[test]
    fn off_list_zoom_starts_from_next_level_up() {
        assert_eq!(target_by_steps(110, 0), 125);
        assert_eq!(target_by_steps(110, -1), 100);
    }

    #[test]
    fn zoom_above_every_level_starts_from_the_bottom() {
        assert_eq!(target_by_steps(300, -1), 50);
        assert_eq!(target_by_steps(300, 0), 50);
        assert_eq!(target_by_steps(300, 2), 90);
    }

    #[test]
    fn presses_accumulate_and_opposite_direction_resets() {
        let mut pending = PendingZoom::default();
        pending.press(ZoomDirection::In);
        pending.press(ZoomDirection::In);
        assert_eq!(pending.take(), Some(2));
        assert_eq!(pending.take(), None);

        pending.press(ZoomDirection::In);
        pending.press(ZoomDirection::Out);
        pending.press(ZoomDirection::Out);
        assert_eq!(pending.take(), Some(-2));
    }

    #[test]
    fn fallback_types_search_text_then_enter() {
        let strokes = typing_sequence(&search_text(75));
        let keys: String = strokes
            .iter()
            .take(strokes.len() - 1)
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(keys, "Zoom: 75%");
        assert_eq!(strokes[0].code, "KeyZ");
        assert_eq!(strokes[4].code, "Semicolon");
        assert_eq!(strokes[6].code, "Digit7");
        assert_eq!(strokes.last().unwrap(), &KeyStroke::enter());
    }
}
