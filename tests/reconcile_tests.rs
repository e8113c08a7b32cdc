//! Property checks for the rectangle reconciler over seeded random inputs.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sheetlight::reconcile::{
    exclude_full_span_duplicates, full_span_fragments, group_by_overlap, is_full_row_or_column,
    merge_adjacent, overlaps_within, DEFAULT_TOLERANCE,
};
use sheetlight::types::{Axis, GridRect, Size};

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 9001, 65535];

const SHEET: Size = Size {
    width: 1000.0,
    height: 600.0,
};

/// Cell-aligned fragments kept well inside the sheet.
fn random_fragments(rng: &mut StdRng, count: usize) -> Vec<GridRect> {
    (0..count)
        .map(|_| {
            GridRect::new(
                f64::from(rng.gen_range(0..30u32)) * 20.0,
                f64::from(rng.gen_range(0..20u32)) * 21.0,
                f64::from(rng.gen_range(0..5u32)) * 20.0,
                f64::from(rng.gen_range(1..4u32)) * 21.0,
            )
        })
        .collect()
}

fn covered(rects: &[GridRect], axis: Axis, point: f64) -> bool {
    rects
        .iter()
        .any(|r| r.start(axis) <= point && point < r.end(axis))
}

#[test]
fn merged_bands_are_sorted_disjoint_and_cover_the_input() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(0..24);
        let rects = random_fragments(&mut rng, count);

        for axis in [Axis::X, Axis::Y] {
            let bands = merge_adjacent(&rects, axis);
            assert!(bands.len() <= rects.len(), "seed {seed}");

            for pair in bands.windows(2) {
                assert!(
                    pair[1].start(axis) > pair[0].end(axis),
                    "seed {seed}: bands {:?} and {:?} touch",
                    pair[0],
                    pair[1]
                );
            }

            for step in 0..1100 {
                let point = f64::from(step) + 0.5;
                assert_eq!(
                    covered(&rects, axis, point),
                    covered(&bands, axis, point),
                    "seed {seed}: coverage differs at {point} on {axis:?}"
                );
            }
        }
    }
}

#[test]
fn merging_is_idempotent() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let rects = random_fragments(&mut rng, 16);
        let once = merge_adjacent(&rects, Axis::Y);
        assert_eq!(merge_adjacent(&once, Axis::Y), once, "seed {seed}");
    }
}

#[test]
fn groups_partition_the_input() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let rects = random_fragments(&mut rng, 20);

        for axis in [Axis::X, Axis::Y] {
            let groups = group_by_overlap(&rects, axis, DEFAULT_TOLERANCE);
            let total: usize = groups.iter().map(Vec::len).sum();
            assert_eq!(total, rects.len(), "seed {seed}");
            assert!(groups.iter().all(|g| !g.is_empty()));

            for (i, a) in groups.iter().enumerate() {
                for b in groups.iter().skip(i + 1) {
                    for ra in a {
                        for rb in b {
                            assert!(
                                !overlaps_within(ra, rb, axis, DEFAULT_TOLERANCE),
                                "seed {seed}: {ra:?} and {rb:?} overlap across groups"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn small_fragments_are_never_full() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let rects = random_fragments(&mut rng, 12);
        assert!(!is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE), "seed {seed}");
        assert!(full_span_fragments(&rects, SHEET, DEFAULT_TOLERANCE).is_empty());
    }
}

#[test]
fn any_full_width_fragment_makes_the_set_full() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rects = random_fragments(&mut rng, 8);
        let y = f64::from(rng.gen_range(0..20u32)) * 21.0;
        let position = rng.gen_range(0..=rects.len());
        rects.insert(position, GridRect::new(0.0, y, SHEET.width, 21.0));
        assert!(is_full_row_or_column(&rects, SHEET, DEFAULT_TOLERANCE), "seed {seed}");
    }
}

#[test]
fn excluding_duplicates_keeps_only_other_lines() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rects = random_fragments(&mut rng, 10);
        let row = GridRect::new(0.0, 630.0, SHEET.width, 21.0);
        rects.push(row);
        rects.push(GridRect::new(200.0, 630.0, 40.0, 21.0));

        let full = full_span_fragments(&rects, SHEET, DEFAULT_TOLERANCE);
        assert_eq!(full, vec![row], "seed {seed}");
        let kept = exclude_full_span_duplicates(&rects, &full);
        assert_eq!(kept.len(), rects.len() - 2, "seed {seed}");
        assert!(kept.iter().all(|r| r.y != 630.0));
    }
}
