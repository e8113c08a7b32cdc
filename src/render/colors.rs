//! Highlight color parsing.
//!
//! The settings store holds the color as whatever the popup's color picker
//! wrote. Only `#rgb` and `#rrggbb` are accepted; anything else falls back to
//! the default color.

/// A CSS color string (e.g., "#c2185b")
pub type CssColor = String;

/// Default highlight color.
pub const DEFAULT_COLOR: &str = "#c2185b";

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the `#` is optional).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| -> Option<u8> {
                    let v = u8::from_str_radix(hex.get(i..=i)?, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Convert to CSS hex string (#rrggbb).
    pub fn to_hex(self) -> CssColor {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Normalize a stored color, or `None` when it is not a hex color.
pub fn normalize_color(s: &str) -> Option<CssColor> {
    Rgb::from_hex(s).map(Rgb::to_hex)
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
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#c2185b"), Some(Rgb::new(0xc2, 0x18, 0x5b)));
        assert_eq!(Rgb::from_hex("0E65EB"), Some(Rgb::new(0x0e, 0x65, 0xeb)));
        assert_eq!(Rgb::from_hex("#f0a"), Some(Rgb::new(0xff, 0x00, 0xaa)));
        assert_eq!(Rgb::from_hex(" #abc "), Some(Rgb::new(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_rgb_from_hex_rejects() {
        assert_eq!(Rgb::from_hex("red"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
        assert_eq!(Rgb::from_hex(""), None);
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("#ABC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_color("rgb(1,2,3)"), None);
    }
}
