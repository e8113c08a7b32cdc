//! Rectangle reconciliation.
//!
//! Pure functions over rectangle lists, independent of any DOM:
//! - Interval merge along one axis (bands)
//! - Transitive overlap grouping (connected components)
//! - Full row / full column classification of a fragment set

mod classify;
mod group;
mod merge;

pub use classify::{
    exclude_full_span_duplicates, full_span_fragments, is_full_row_or_column, DEFAULT_TOLERANCE,
};
pub use group::{group_by_overlap, overlaps_within};
pub use merge::merge_adjacent;
