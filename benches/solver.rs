//! Benchmarks for the grid-filling searches.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gridfill::enumerator::candidates_for;
use gridfill::pieces::builtin;
use gridfill::solver::{self, CountMode, CountOptions, FillerPiece, PieceStock, RequiredPiece};
use gridfill::GridMask;

/// Benchmark counting every domino tiling of a 6x6 grid.
fn bench_count_dominoes(c: &mut Criterion) {
    let grid = GridMask::full(6, 6).unwrap();
    let catalog = [PieceStock::new(builtin("domino").unwrap(), 18)];
    let options = CountOptions {
        mode: CountMode::AllPermutations,
        max_stored: 0,
        ..CountOptions::default()
    };

    let mut group = c.benchmark_group("count");
    group.sample_size(10);
    group.bench_function("dominoes_6x6", |b| {
        b.iter(|| solver::count(black_box(&grid), &catalog, &options))
    });
    group.bench_function("dominoes_6x6_unique", |b| {
        let unique = CountOptions {
            mode: CountMode::UniqueLayouts,
            ..options.clone()
        };
        b.iter(|| solver::count(black_box(&grid), &catalog, &unique))
    });
    group.finish();
}

/// Benchmark a constrained solve with tetromino requirements.
fn bench_constrained_solve(c: &mut Criterion) {
    let grid = GridMask::full(8, 8).unwrap();
    let required = [
        RequiredPiece::new(builtin("t").unwrap(), 2),
        RequiredPiece::new(builtin("l").unwrap(), 2),
    ];
    let fillers = [
        FillerPiece::new(builtin("o").unwrap(), 4),
        FillerPiece::new(builtin("domino").unwrap(), 12),
        FillerPiece::new(builtin("monomino").unwrap(), 8),
    ];

    c.bench_function("solve_8x8", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            let timeout = Some(Duration::from_secs(1));
            solver::solve(black_box(&grid), &required, &fillers, timeout, &mut rng)
        })
    });
}

/// Benchmark enumerating candidates for one piece at an open cell.
fn bench_candidates(c: &mut Criterion) {
    let grid = GridMask::full(8, 8).unwrap();
    let piece = builtin("l").unwrap();

    c.bench_function("candidates_l_tetromino", |b| {
        b.iter(|| candidates_for(black_box(&grid), (4, 4), &piece))
    });
}

criterion_group!(
    benches,
    bench_count_dominoes,
    bench_constrained_solve,
    bench_candidates
);
criterion_main!(benches);
