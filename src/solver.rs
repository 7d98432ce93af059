//! The solver façade: one entry point, two interchangeable strategies.
//!
//! Replaces the reference implementation's `MazeSolver -> SkippingMazeSolver
//! -> {multithreaded, single-threaded}` inheritance chain with a single
//! `Solver` trait and two free-standing implementations that share nothing
//! but the `Maze` they're handed.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cell::CellGrid;
use crate::maze::Maze;
use crate::position::Direction;
use crate::pruner::{row_ranges, run_band, BandLinks};
use crate::painter::run_painter;
use crate::ring::BandRing;
use crate::walker::run_walker;

/// A maze-solving strategy: given a loaded maze, produce a sequence of
/// moves from `maze.start()`. An empty vector means no solution was found.
pub trait Solver {
    fn solve(&self, maze: &Maze) -> Vec<Direction>;
}

/// M1: row-band pruning plus a reverse painter and forward walker racing
/// to a meeting point. `bands` pruner threads partition the grid's rows;
/// §4.8 suggests logical-CPU count minus two, leaving room for the
/// painter and walker threads themselves.
pub struct PrunerWalker {
    pub bands: usize,
}

impl PrunerWalker {
    pub fn new(bands: usize) -> Self {
        assert!(bands > 0, "M1 needs at least one pruner band");
        PrunerWalker { bands }
    }
}

impl Solver for PrunerWalker {
    fn solve(&self, maze: &Maze) -> Vec<Direction> {
        let grid = Arc::clone(maze.grid());
        let bands = self.bands.min(grid.height);
        let ranges = row_ranges(grid.height, bands);

        // One ring pair per internal boundary, each leg single-producer/
        // single-consumer: band i's "below" ring is band i+1's "above" ring.
        let boundaries: Vec<(Arc<BandRing>, Arc<BandRing>)> = (0..bands.saturating_sub(1))
            .map(|_| (Arc::new(BandRing::new()), Arc::new(BandRing::new())))
            .collect();

        let stop = AtomicBool::new(false);

        std::thread::scope(|scope| {
            for (i, &(row_start, row_end)) in ranges.iter().enumerate() {
                let grid = Arc::clone(&grid);
                let stop_ref = &stop;
                let protect = if i == 0 {
                    Some(grid.start())
                } else if i == ranges.len() - 1 {
                    Some(grid.end())
                } else {
                    None
                };

                let mut links = BandLinks::default();
                if i > 0 {
                    let (down, up) = &boundaries[i - 1];
                    links.incoming_above = Some(Arc::clone(down));
                    links.outgoing_above = Some(Arc::clone(up));
                }
                if i < bands - 1 {
                    let (down, up) = &boundaries[i];
                    links.outgoing_below = Some(Arc::clone(down));
                    links.incoming_below = Some(Arc::clone(up));
                }

                scope.spawn(move || {
                    run_band(&grid, row_start, row_end, protect, links, stop_ref);
                });
            }

            let painter_grid = Arc::clone(&grid);
            let stop_ref = &stop;
            scope.spawn(move || {
                run_painter(&painter_grid, stop_ref);
            });

            run_walker(&grid, &stop)
        })
    }
}

/// M2: `forward_workers` forward DFS threads racing `reverse_workers`
/// reverse DFS threads to a meeting point (or a direct hit on `end`).
pub struct BidirectionalDfs {
    pub forward_workers: usize,
    pub reverse_workers: usize,
}

impl BidirectionalDfs {
    pub fn new(forward_workers: usize, reverse_workers: usize) -> Self {
        BidirectionalDfs {
            forward_workers,
            reverse_workers,
        }
    }
}

impl Solver for BidirectionalDfs {
    fn solve(&self, maze: &Maze) -> Vec<Direction> {
        crate::bidi::solve(maze.grid(), self.forward_workers, self.reverse_workers)
    }
}

/// Verifies the fatal conditions §4.8 calls out as programmer bugs rather
/// than recoverable outcomes: a claimed solution path that ever touches a
/// cell the pruners marked DEAD. Called after a solve, before trusting
/// its result for anything beyond `check_solution`'s well-formedness gate.
///
/// # Panics
/// Panics if any cell visited along `path` (other than the final `end`
/// landing, which pruning never marks since `end` is always protected)
/// carries the DEAD bit.
pub fn assert_no_dead_cell_on_path(grid: &CellGrid, start: crate::position::Position, path: &[Direction]) {
    let mut at = start;
    assert!(
        !grid.is_dead(at),
        "solver returned a path starting from a cell already marked DEAD: {}",
        at
    );
    for &dir in path {
        at = at.step(dir);
        assert!(
            !grid.is_dead(at),
            "solver returned a path passing through a cell marked DEAD: {}",
            at
        );
    }
}
