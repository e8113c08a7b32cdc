use crate::types::{Axis, Frame, Rect};

/// True when the extents of `a` and `b` on `axis`, each widened by
/// `tolerance` at the end, intersect.
pub fn overlaps_within<F: Frame>(a: &Rect<F>, b: &Rect<F>, axis: Axis, tolerance: f64) -> bool {
    a.start(axis) < b.end(axis) + tolerance && b.start(axis) < a.end(axis) + tolerance
}

/// Partition `rects` into connected components of the overlap graph on `axis`.
///
/// Two rectangles share a group when they overlap within `tolerance`, or are
/// linked through a chain of such overlaps. Every input rectangle lands in
/// exactly one group. Groups are seeded in input order and grown by frontier
/// expansion, which is quadratic but fine for the handful of fragments a
/// visible selection produces.
pub fn group_by_overlap<F: Frame>(
    rects: &[Rect<F>],
    axis: Axis,
    tolerance: f64,
) -> Vec<Vec<Rect<F>>> {
    let mut pending: Vec<Option<Rect<F>>> = rects.iter().copied().map(Some).collect();
    let mut groups = Vec::new();

    for seed_index in 0..pending.len() {
        let Some(seed) = pending.get_mut(seed_index).and_then(Option::take) else {
            continue;
        };

        let mut group = vec![seed];
        let mut frontier = 0;
        while let Some(current) = group.get(frontier).copied() {
            frontier += 1;
            for slot in pending.iter_mut() {
                let joins = slot
                    .as_ref()
                    .is_some_and(|candidate| overlaps_within(&current, candidate, axis, tolerance));
                if joins {
                    if let Some(rect) = slot.take() {
                        group.push(rect);
                    }
                }
            }
        }
        groups.push(group);
    }

    groups
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
    use crate::types::GridRect;

    #[test]
    fn chain_of_overlaps_forms_one_group() {
        // a overlaps b, b overlaps c, a and c are apart: transitive closure joins all three.
        let rects = [
            GridRect::new(0.0, 0.0, 10.0, 20.0),
            GridRect::new(0.0, 40.0, 10.0, 20.0),
            GridRect::new(0.0, 15.0, 10.0, 30.0),
        ];
        let groups = group_by_overlap(&rects, Axis::Y, 0.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn tolerance_bridges_small_gaps() {
        let rects = [
            GridRect::new(0.0, 0.0, 10.0, 20.0),
            GridRect::new(0.0, 21.0, 10.0, 20.0),
        ];
        assert_eq!(group_by_overlap(&rects, Axis::Y, 0.0).len(), 2);
        assert_eq!(group_by_overlap(&rects, Axis::Y, 2.0).len(), 1);
    }

    #[test]
    fn groups_seed_in_input_order() {
        let rects = [
            GridRect::new(0.0, 100.0, 10.0, 10.0),
            GridRect::new(0.0, 0.0, 10.0, 10.0),
        ];
        let groups = group_by_overlap(&rects, Axis::Y, 0.0);
        assert_eq!(groups[0][0].y, 100.0);
        assert_eq!(groups[1][0].y, 0.0);
    }
}
