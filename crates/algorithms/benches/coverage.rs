//! Benchmarks for the coverage stages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::Point;
use gridcover_algorithms::density::{kernel_density, IndexKind, KernelDensityParams};
use gridcover_algorithms::proximity::proximity_mask;
use gridcover_algorithms::vector::BufferParams;
use gridcover_algorithms::vectorize::extract_regions;
use gridcover_core::{Layer, Raster, RasterGrid, WeightedPoint};

fn create_grid(size: usize) -> RasterGrid {
    RasterGrid::new(0.0, size as f64 * 100.0, 100.0, size, size).unwrap()
}

/// Deterministic scatter of weighted points over the grid
fn create_points(n: usize, extent: f64) -> Layer<WeightedPoint> {
    let points = (0..n)
        .map(|i| {
            let x = ((i * 7919) % 10_007) as f64 / 10_007.0 * extent;
            let y = ((i * 104_729) % 10_009) as f64 / 10_009.0 * extent;
            WeightedPoint::new(x, y, 1.0 + (i % 50) as f64)
        })
        .collect();
    Layer::untagged(points)
}

fn bench_kernel_density(c: &mut Criterion) {
    let mut group = c.benchmark_group("density/kernel");
    let grid = create_grid(512);
    let extent = 512.0 * 100.0;

    for n in [1_000, 10_000] {
        let points = create_points(n, extent);
        for (label, index) in [("kdtree", IndexKind::KdTree), ("grid", IndexKind::Grid)] {
            let params = KernelDensityParams {
                radius: 2_500.0,
                index,
            };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| kernel_density(black_box(&points), black_box(&grid), &params).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_proximity(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity/mask");
    let grid = create_grid(512);
    let extent = 512.0 * 100.0;

    for n in [10, 100, 500] {
        let facilities: Layer<Point<f64>> = Layer::untagged(
            create_points(n, extent)
                .iter()
                .map(|p| p.point())
                .collect(),
        );
        let params = BufferParams {
            distance: 3_000.0,
            segments: 64,
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| proximity_mask(black_box(&facilities), black_box(&grid), &params).unwrap())
        });
    }
    group.finish();
}

fn bench_extract_regions(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorize/regions");
    for size in [256, 512, 1024] {
        let grid = create_grid(size);
        let mut band = Raster::from_grid(&grid, 0u8);
        for row in 0..size {
            for col in 0..size {
                if (row / 16 + col / 16) % 3 == 0 {
                    band.set(row, col, 1).unwrap();
                }
            }
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| extract_regions(black_box(&band)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernel_density, bench_proximity, bench_extract_regions);
criterion_main!(benches);
