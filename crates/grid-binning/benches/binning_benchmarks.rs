//! Benchmarks for per-timestep indexing and aggregation.
//!
//! Run with: cargo bench --package grid-binning --bench binning_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_binning::{
    BoundingBox3, CellAggregator, CellIndexer, EarthConstants, Grid, GridDefinition, UnitMode,
    Xyz,
};
use rand::Rng;

/// A 0.1° coastal grid with 20 depth layers.
fn benchmark_grid() -> Grid {
    let def = GridDefinition::new(
        BoundingBox3::new(Xyz::new(-10.0, 36.0, 0.0), Xyz::new(-5.0, 44.0, 200.0)),
        Xyz::new(0.1, 0.1, 10.0),
        UnitMode::Degrees,
    );
    Grid::build(&def, &EarthConstants::default()).expect("benchmark grid")
}

/// Random particle cloud, with a few percent outside the domain.
fn generate_positions(n: usize) -> Vec<[f64; 3]> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            [
                rng.gen_range(-5.0..210.0),
                rng.gen_range(35.8..44.2),
                rng.gen_range(-10.2..-4.8),
            ]
        })
        .collect()
}

fn generate_values(n: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(0.0..35.0)).collect()
}

// =============================================================================
// INDEXING BENCHMARKS
// =============================================================================

fn bench_index(c: &mut Criterion) {
    let grid = benchmark_grid();
    let mut group = c.benchmark_group("index");

    for &n in &[10_000usize, 100_000, 1_000_000] {
        let positions = generate_positions(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("sequential", n), &positions, |b, p| {
            let indexer = CellIndexer::new(&grid).with_parallel_threshold(usize::MAX);
            b.iter(|| black_box(indexer.index(p)))
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &positions, |b, p| {
            let indexer = CellIndexer::new(&grid).with_parallel_threshold(1);
            b.iter(|| black_box(indexer.index(p)))
        });
    }

    group.finish();
}

// =============================================================================
// AGGREGATION BENCHMARKS
// =============================================================================

fn bench_aggregate(c: &mut Criterion) {
    let grid = benchmark_grid();
    let mut group = c.benchmark_group("aggregate");

    for &n in &[10_000usize, 100_000, 1_000_000] {
        let positions = generate_positions(n);
        let values = generate_values(n);
        let map = CellIndexer::new(&grid).index(&positions);
        let aggregator = CellAggregator::new(&grid);
        let counts = aggregator.count(&map).expect("counts");
        let valid = grid_binning::occupied_cells(&counts);

        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("count", n), &map, |b, map| {
            b.iter(|| black_box(aggregator.count(map)))
        });

        group.bench_with_input(BenchmarkId::new("mean_in_cells", n), &map, |b, map| {
            b.iter(|| black_box(aggregator.mean_in_cells(map.ids(), &valid, &values)))
        });

        group.bench_with_input(BenchmarkId::new("statistics", n), &positions, |b, p| {
            b.iter(|| black_box(aggregator.statistics(p, Some(values.as_slice()))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index, bench_aggregate);
criterion_main!(benches);
