//! Rectangle model with the coordinate frame carried in the type.
//!
//! The two host integrations report geometry in the browser (viewport) frame,
//! while bands are laid out relative to the sheet container. Mixing the two
//! is the classic off-by-offset bug, so a `Rect<Page>` cannot be passed where
//! a `Rect<GridLocal>` is expected without an explicit conversion.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Marker trait for coordinate frames.
pub trait Frame: Copy + Clone + fmt::Debug + Default + PartialEq {
    /// Short name used in logs.
    const NAME: &'static str;
}

/// Browser frame: relative to the viewport, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page;

/// Grid-local frame: relative to the sheet container's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridLocal;

impl Frame for Page {
    const NAME: &'static str = "page";
}

impl Frame for GridLocal {
    const NAME: &'static str = "grid";
}

/// Geometry axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal (x / width)
    X,
    /// Vertical (y / height)
    Y,
}

/// Width and height without a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Axis-aligned rectangle in frame `F`.
///
/// Width and height are never negative; zero-area rectangles are allowed and
/// flow through every algorithm without special casing.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect<F: Frame = GridLocal> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    frame: PhantomData<F>,
}

pub type PageRect = Rect<Page>;
pub type GridRect = Rect<GridLocal>;

impl<F: Frame> fmt::Debug for Rect<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect<{}>({}, {}, {}x{})",
            F::NAME,
            self.x,
            self.y,
            self.width,
            self.height
        )
    }
}

impl<F: Frame> Default for Rect<F> {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl<F: Frame> Rect<F> {
    /// Create a rectangle, clamping negative sizes to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            frame: PhantomData,
        }
    }

    /// Build from edges; inverted edges produce a zero-sized rectangle.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Start coordinate on `axis`.
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// End coordinate on `axis` (exclusive).
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right(),
            Axis::Y => self.bottom(),
        }
    }

    /// Extent on `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Copy with the extent on `axis` replaced.
    #[must_use]
    pub fn with_extent(&self, axis: Axis, start: f64, extent: f64) -> Self {
        match axis {
            Axis::X => Self::new(start, self.y, extent, self.height),
            Axis::Y => Self::new(self.x, start, self.width, extent),
        }
    }

    /// Zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width at least as large as height.
    pub fn is_horizontal(&self) -> bool {
        self.width >= self.height
    }

    /// Signed overlap length with `other` on `axis` (negative when apart).
    pub fn overlap(&self, other: &Self, axis: Axis) -> f64 {
        self.end(axis).min(other.end(axis)) - self.start(axis).max(other.start(axis))
    }

    /// Round every component up to whole pixels.
    #[must_use]
    pub fn ceil(&self) -> Self {
        Self::new(
            self.x.ceil(),
            self.y.ceil(),
            self.width.ceil(),
            self.height.ceil(),
        )
    }

    /// Same position and size within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

impl Rect<Page> {
    /// Express this rectangle relative to `origin`'s top-left corner.
    pub fn to_grid_local(&self, origin: &Rect<Page>) -> Rect<GridLocal> {
        Rect::new(
            self.x - origin.x,
            self.y - origin.y,
            self.width,
            self.height,
        )
    }
}

impl Rect<GridLocal> {
    /// Back to the browser frame, given the container the rectangle is local to.
    pub fn to_page(&self, origin: &Rect<Page>) -> Rect<Page> {
        Rect::new(
            self.x + origin.x,
            self.y + origin.y,
            self.width,
            self.height,
        )
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

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let rect = GridRect::new(5.0, 5.0, -3.0, 4.0);
        assert_eq!(rect.width, 0.0);
        assert!(rect.is_degenerate());
    }

    #[test]
    fn frame_conversion_round_trips_through_origin() {
        let origin = PageRect::new(40.0, 120.0, 800.0, 600.0);
        let cell = PageRect::new(140.0, 141.0, 100.0, 21.0);
        let local = cell.to_grid_local(&origin);
        assert_eq!((local.x, local.y), (100.0, 21.0));
        assert!(local.to_page(&origin).approx_eq(&cell, 0.0));
    }

    #[test]
    fn overlap_is_negative_when_apart() {
        let a = GridRect::new(0.0, 0.0, 10.0, 10.0);
        let b = GridRect::new(15.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap(&b, Axis::X), -5.0);
        assert_eq!(a.overlap(&b, Axis::Y), 10.0);
    }

    #[test]
    fn ceil_rounds_sub_pixel_fragments_up() {
        let rect = GridRect::new(10.2, 3.5, 99.1, 20.9).ceil();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (11.0, 4.0, 100.0, 21.0));
    }

    #[test]
    fn serde_shape_has_no_frame_field() {
        let json = serde_json::to_string(&PageRect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
    }
}
