//! Inline styles for overlay elements.

use super::plan::{BandTask, TaskKind};
use crate::config::RenderConfig;
use crate::dom::StyleDecl;
use crate::types::PageRect;

/// Header bands are filled, so they stay fainter than the outlined bands.
pub const HEADER_OPACITY: &str = "0.4";

fn px(v: f64) -> String {
    format!("{v}px")
}

fn border(thickness: f64, color: &str) -> String {
    format!("{thickness}px solid {color}")
}

fn overlay_base() -> Vec<StyleDecl> {
    vec![
        ("position", "absolute".to_string()),
        ("pointer-events", "none".to_string()),
    ]
}

/// Style hiding a surplus pool element.
pub fn hidden_style() -> Vec<StyleDecl> {
    vec![("display", "none".to_string())]
}

/// Band container: positioned over the sheet container, clipping bands to it.
pub fn band_container_style(container: &[StyleDecl]) -> Vec<StyleDecl> {
    let mut style = overlay_base();
    style.push(("overflow", "hidden".to_string()));
    style.extend(container.iter().cloned());
    style
}

/// Header container: the whole viewport, since headers are in page frame.
pub fn header_container_style() -> Vec<StyleDecl> {
    let mut style = overlay_base();
    style.extend([
        ("left", "0px".to_string()),
        ("top", "0px".to_string()),
        ("width", "100%".to_string()),
        ("height", "100%".to_string()),
        ("overflow", "hidden".to_string()),
    ]);
    style
}

/// Outlined, transparent band. Rows draw top/bottom borders, columns
/// left/right, the intersection all four.
pub fn band_style(task: &BandTask, config: &RenderConfig) -> Vec<StyleDecl> {
    let line = border(config.line_thickness, &config.background_color);
    let none = || "none".to_string();
    let (top, bottom, left, right) = match task.kind {
        TaskKind::Row => (line.clone(), line, none(), none()),
        TaskKind::Column => (none(), none(), line.clone(), line),
        TaskKind::Intersection => (line.clone(), line.clone(), line.clone(), line),
    };

    let mut style = overlay_base();
    style.extend([
        ("display", "block".to_string()),
        ("background-color", "transparent".to_string()),
        ("opacity", config.opacity.to_string()),
        ("left", task.left.to_string()),
        ("top", task.top.to_string()),
        ("width", task.width.to_string()),
        ("height", task.height.to_string()),
        ("border-top", top),
        ("border-bottom", bottom),
        ("border-left", left),
        ("border-right", right),
    ]);
    style
}

/// Filled header band at a fixed opacity, no border.
pub fn header_style(rect: &PageRect, config: &RenderConfig) -> Vec<StyleDecl> {
    let mut style = overlay_base();
    style.extend([
        ("display", "block".to_string()),
        ("background-color", config.background_color.clone()),
        ("opacity", HEADER_OPACITY.to_string()),
        ("left", px(rect.x)),
        ("top", px(rect.y)),
        ("width", px(rect.width)),
        ("height", px(rect.height)),
        ("border", "none".to_string()),
    ]);
    style
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
    use super::super::plan::Length;
    use super::*;

    fn lookup<'a>(style: &'a [StyleDecl], property: &str) -> Option<&'a str> {
        style
            .iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn row_band_has_horizontal_borders_only() {
        let task = BandTask {
            kind: TaskKind::Row,
            left: Length::Px(0.0),
            top: Length::Px(41.0),
            width: Length::Percent(100.0),
            height: Length::Px(19.0),
        };
        let style = band_style(&task, &RenderConfig::default());
        assert_eq!(lookup(&style, "border-top"), Some("1.75px solid #c2185b"));
        assert_eq!(lookup(&style, "border-bottom"), Some("1.75px solid #c2185b"));
        assert_eq!(lookup(&style, "border-left"), Some("none"));
        assert_eq!(lookup(&style, "width"), Some("100%"));
        assert_eq!(lookup(&style, "opacity"), Some("0.8"));
        assert_eq!(lookup(&style, "pointer-events"), Some("none"));
    }

    #[test]
    fn container_style_overrides_follow_base() {
        let style = band_container_style(&[("left", "46px".to_string())]);
        assert_eq!(lookup(&style, "overflow"), Some("hidden"));
        assert_eq!(lookup(&style, "left"), Some("46px"));
    }

    #[test]
    fn header_is_filled_and_faint() {
        let style = header_style(&PageRect::new(1.0, 2.0, 3.0, 4.5), &RenderConfig::default());
        assert_eq!(lookup(&style, "background-color"), Some("#c2185b"));
        assert_eq!(lookup(&style, "opacity"), Some("0.4"));
        assert_eq!(lookup(&style, "height"), Some("4.5px"));
        assert_eq!(lookup(&style, "border"), Some("none"));
    }
}
