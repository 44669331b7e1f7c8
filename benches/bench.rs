use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use sudoku_solver::sudoku::grid::{EXAMPLE_PUZZLE, Grid, SIDE};
use sudoku_solver::sudoku::propagation::propagate;
use sudoku_solver::sudoku::search::solve;

/// Seventeen scattered clues: propagation stalls immediately, so this
/// exercises the forking search rather than pure propagation.
fn sparse_puzzle() -> Grid {
    let mut values = [0u8; 81];
    for (row, col, value) in [
        (0, 0, 5),
        (0, 5, 8),
        (1, 2, 2),
        (1, 7, 4),
        (2, 4, 4),
        (2, 8, 7),
        (3, 1, 5),
        (3, 6, 4),
        (4, 3, 8),
        (4, 8, 1),
        (5, 0, 7),
        (5, 5, 4),
        (6, 2, 1),
        (6, 7, 8),
        (7, 1, 8),
        (7, 4, 1),
        (8, 6, 1),
    ] {
        values[row * SIDE + col] = value;
    }
    Grid::new(&values).expect("17 consistent clues")
}

fn bench_propagation(c: &mut Criterion) {
    let grid = Grid::try_from(EXAMPLE_PUZZLE).expect("example puzzle is valid");
    c.bench_function("propagate_canonical", |b| {
        b.iter(|| {
            let mut branch = black_box(grid.clone());
            black_box(propagate(&mut branch))
        });
    });
}

fn bench_solve_canonical(c: &mut Criterion) {
    let grid = Grid::try_from(EXAMPLE_PUZZLE).expect("example puzzle is valid");
    c.bench_function("solve_canonical_30_clues", |b| {
        b.iter(|| solve(black_box(grid.clone())).wait());
    });
}

fn bench_solve_sparse(c: &mut Criterion) {
    let grid = sparse_puzzle();
    c.bench_function("solve_sparse_17_clues", |b| {
        b.iter(|| solve(black_box(grid.clone())).wait());
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50);
    targets = bench_propagation, bench_solve_canonical, bench_solve_sparse
}
criterion_main!(benches);
