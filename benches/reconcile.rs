//! Benchmarks for the per-cycle geometry work.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sheetlight::app::HighlighterApp;
use sheetlight::dom::{MemoryDocument, MemoryElement, MemorySurface};
use sheetlight::locator::{highlight_rects_from_fragments, sheets_profile};
use sheetlight::reconcile::{group_by_overlap, merge_adjacent, DEFAULT_TOLERANCE};
use sheetlight::types::{Axis, GridRect, PageRect};

/// A scattered multi-range selection: `count` cells on a 100x21 grid.
fn scattered_cells(count: u32) -> Vec<GridRect> {
    (0..count)
        .map(|i| {
            let col = (i * 7) % 40;
            let row = (i * 13) % 200;
            GridRect::new(f64::from(col) * 100.0, f64::from(row) * 21.0, 100.0, 21.0)
        })
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_adjacent");
    for count in [4u32, 64, 512] {
        let rects = scattered_cells(count);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &rects, |b, rects| {
            b.iter(|| {
                merge_adjacent(black_box(rects), Axis::Y);
                merge_adjacent(black_box(rects), Axis::X)
            })
        });
    }
    group.finish();
}

fn bench_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by_overlap");
    for count in [4u32, 64, 256] {
        let rects = scattered_cells(count);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &rects, |b, rects| {
            b.iter(|| group_by_overlap(black_box(rects), Axis::Y, DEFAULT_TOLERANCE))
        });
    }
    group.finish();
}

fn bench_fragments(c: &mut Criterion) {
    let sheet = PageRect::new(50.0, 150.0, 4000.0, 4200.0);
    let fragments: Vec<PageRect> = scattered_cells(64)
        .iter()
        .map(|r| r.to_page(&sheet))
        .collect();
    c.bench_function("highlight_rects_from_fragments_64", |b| {
        b.iter(|| highlight_rects_from_fragments(black_box(&fragments), &sheet, DEFAULT_TOLERANCE))
    });
}

/// One full update cycle on a Sheets page with a 16-cell selection.
fn bench_cycle(c: &mut Criterion) {
    let selectors = sheets_profile().selectors;
    let mut document = MemoryDocument::new("https://docs.google.com/spreadsheets/d/bench/edit");
    document.add(
        MemoryElement::new(PageRect::new(50.0, 150.0, 4000.0, 4200.0)).with_id(&selectors.container_id),
    );
    for border in [
        PageRect::new(148.0, 169.0, 104.0, 2.0),
        PageRect::new(148.0, 192.0, 104.0, 2.0),
        PageRect::new(148.0, 171.0, 2.0, 21.0),
        PageRect::new(250.0, 171.0, 2.0, 21.0),
    ] {
        document.add(MemoryElement::new(border).with_class(&selectors.active_border_class));
    }
    for rect in scattered_cells(16) {
        let page = rect.to_page(&PageRect::new(50.0, 150.0, 4000.0, 4200.0));
        document.add(MemoryElement::new(page).with_class(&selectors.selection_class));
    }

    let mut app = HighlighterApp::new(document, MemorySurface::new()).expect("app");
    c.bench_function("update_cycle_16", |b| b.iter(|| app.update().expect("cycle")));
}

criterion_group!(benches, bench_merge, bench_group, bench_fragments, bench_cycle);
criterion_main!(benches);
