use serde::{Deserialize, Serialize};

use super::rect::{Axis, GridRect, PageRect};

/// Orientation of a highlight band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandKind {
    /// Full-width band over the active row(s)
    Row,
    /// Full-height band over the active column(s)
    Column,
}

impl BandKind {
    /// Axis along which fragments are merged for this band kind.
    ///
    /// Row bands collapse fragments that overlap vertically; column bands
    /// collapse fragments that overlap horizontally.
    pub fn merge_axis(self) -> Axis {
        match self {
            Self::Row => Axis::Y,
            Self::Column => Axis::X,
        }
    }
}

/// A merged band to render, in grid-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightBand {
    pub kind: BandKind,
    pub rect: GridRect,
}

/// Which header gutter a header highlight sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAxis {
    /// Column-letter gutter above the grid
    Column,
    /// Row-number gutter left of the grid
    Row,
}

impl HeaderAxis {
    /// Axis on which a header cell must overlap the active cell.
    pub fn overlap_axis(self) -> Axis {
        match self {
            Self::Column => Axis::X,
            Self::Row => Axis::Y,
        }
    }
}

/// Highlight over a header gutter cell, in browser frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderHighlight {
    pub axis: HeaderAxis,
    pub rect: PageRect,
}
