//! Geometry and highlight data types shared by the locator, reconciler and renderer.

mod band;
mod rect;

pub use band::*;
pub use rect::*;
