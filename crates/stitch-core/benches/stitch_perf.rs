//! Tiling and stitching performance benchmarks
//!
//! Measures the tile planner on a tall page and a full-page capture of an
//! in-memory 1920x8000 page through a 1920x1080 viewport, with no
//! stabilization delay. This isolates the crop/composite cost on the
//! critical path.

use std::{hint::black_box, sync::Arc, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};
use stitch_core::{
    capture::{
        FixedRegionProvider, FullPageCaptureAlgorithm, ImageBuffer, MockViewport,
        NullCutProvider, NullScaleProvider, StitchConfig, StitchProviders,
        ViewportScreenshotFactory,
    },
    geometry::{RectangleSize, Region},
};

fn bench_sub_regions(c: &mut Criterion) {
    let page = Region::new(0, 0, 1920, 100_000);
    let tile = RectangleSize::new(1920, 1030);

    c.bench_function("sub_regions_varying_100k", |b| {
        b.iter(|| black_box(&page).sub_regions(black_box(tile), false).unwrap());
    });

    c.bench_function("sub_regions_fixed_100k", |b| {
        b.iter(|| black_box(&page).sub_regions(black_box(tile), true).unwrap());
    });
}

fn bench_full_page_stitch(c: &mut Criterion) {
    let page = ImageBuffer::from_test_pattern(1920, 8000);
    let viewport = Arc::new(MockViewport::new(page, RectangleSize::new(1920, 1080)));
    let factory = ViewportScreenshotFactory::new(viewport.clone());
    let region = FixedRegionProvider::entire();
    let providers = StitchProviders {
        image_provider: viewport.as_ref(),
        region_provider: &region,
        origin_provider: viewport.as_ref(),
        position_provider: viewport.as_ref(),
        scale_provider: &NullScaleProvider,
        cut_provider: &NullCutProvider,
        screenshot_factory: &factory,
    };
    let algorithm = FullPageCaptureAlgorithm::new(
        StitchConfig::builder()
            .wait_before_screenshots(Duration::ZERO)
            .build(),
    );

    let mut group = c.benchmark_group("stitch");
    group.sample_size(10);
    group.bench_function("full_page_1920x8000", |b| {
        b.iter(|| algorithm.get_stitched_region(black_box(&providers)).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_sub_regions, bench_full_page_stitch);
criterion_main!(benches);
