use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use labyrinth_solver::maze::Maze;
use labyrinth_solver::position::Position;
use labyrinth_solver::ring::Spsc;
use labyrinth_solver::solver::{BidirectionalDfs, PrunerWalker};
use labyrinth_solver::testutil::recursive_backtracker;
use labyrinth_solver::Solver;

fn bench_ring(c: &mut Criterion) {
    c.bench_function("ring push_pop 4096 single threaded", |b| {
        b.iter(|| {
            let ring: Spsc<8192> = Spsc::new();
            let mut out = Position::default();
            for i in 0..4096i64 {
                ring.push(Position::new(i, i));
            }
            for _ in 0..4096 {
                ring.pop(&mut out);
            }
        });
    });
}

fn bench_cell_queries(c: &mut Criterion) {
    let grid = recursive_backtracker(200, 200, Some(7));
    c.bench_function("get_moves over a 200x200 grid", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for row in 0..grid.height {
                for col in 0..grid.width {
                    total += grid.get_moves(Position::new(row as i64, col as i64)).len();
                }
            }
            total
        });
    });
}

fn bench_m1(c: &mut Criterion) {
    c.bench_function("M1 solve 200x200", |b| {
        b.iter(|| {
            let grid = recursive_backtracker(200, 200, Some(11));
            let maze = Maze::from_grid(grid);
            let solver = PrunerWalker::new(4);
            solver.solve(&maze)
        });
    });
}

fn bench_m2(c: &mut Criterion) {
    c.bench_function("M2 solve 200x200", |b| {
        b.iter(|| {
            let grid = recursive_backtracker(200, 200, Some(12));
            let maze = Maze::from_grid(grid);
            let solver = BidirectionalDfs::new(4, 4);
            solver.solve(&maze)
        });
    });
}

fn bench_arc_clone_overhead(c: &mut Criterion) {
    let grid = Arc::new(recursive_backtracker(50, 50, Some(3)));
    c.bench_function("Arc<CellGrid> clone", |b| {
        b.iter(|| Arc::clone(&grid));
    });
}

criterion_group!(
    benches,
    bench_ring,
    bench_cell_queries,
    bench_m1,
    bench_m2,
    bench_arc_clone_overhead,
);
criterion_main!(benches);
