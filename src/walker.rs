//! M1's forward corridor walker: advances from the maze's start one step
//! at a time, skipping over unambiguous corridor cells as the pruners
//! collapse side branches behind it, until either it reaches the end
//! directly or it steps onto a cell the reverse painter has already
//! tagged — at which point the remainder of the path is read straight off
//! the painted parent-direction chain instead of being searched for.
//!
//! Grounded on the reference solver's `walkThreadTB`: note that unlike a
//! plain corridor-following walk (see [`crate::choice::follow_corridor`]),
//! this one *waits* at a true junction rather than picking a branch,
//! trusting the row-band pruners to eventually collapse every junction on
//! the true path down to a single remaining choice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cell::CellGrid;
use crate::position::Direction;

/// How long to sleep between re-checks of a junction that has not yet
/// been pruned down to a single choice. Matches the reference walker's
/// fixed 1ms poll; this thread is the slow consumer of pruning progress,
/// not a busy-spinner racing it.
const JUNCTION_POLL: std::time::Duration = std::time::Duration::from_millis(1);

/// Walks from `grid.start()` to `grid.end()`, returning the full solution
/// path, and signals `stop` (release) once done so every other M1 worker
/// (pruners, painter) can exit their loops.
///
/// # Panics
/// Panics if it ever reaches a cell with zero legal moves other than the
/// one it arrived from — a true dead end on the unique path from start to
/// end is impossible in a solvable maze once pruning has run, so hitting
/// one means the pruning invariant was violated.
pub fn run_walker(grid: &Arc<CellGrid>, stop: &AtomicBool) -> Vec<Direction> {
    let end = grid.end();
    let mut path = Vec::new();
    let mut curr = grid.start();
    let mut came_from = Direction::Uninitialized;

    while curr != end {
        // Acquire: synchronizes with the painter's Release publish of this
        // cell's tag, so every tag it wrote earlier (every cell nearer
        // `end` than this one) is visible by the time the loop below reads
        // them with plain Relaxed loads.
        if grid.is_reverse_tagged_acquire(curr) {
            break;
        }

        let mut moves = grid.get_moves(curr);
        if came_from != Direction::Uninitialized {
            moves.remove(came_from);
        }

        let go_to = match moves.len() {
            1 => moves.first(),
            0 => panic!(
                "forward walker reached a dead end at {} with no way forward",
                curr
            ),
            _ => {
                std::thread::sleep(JUNCTION_POLL);
                continue;
            }
        };

        path.push(go_to);
        curr = curr.step(go_to);
        came_from = go_to.reverse();
    }

    while curr != end {
        let dir = grid.reverse_tag(curr);
        path.push(dir);
        curr = curr.step(dir);
    }

    stop.store(true, Ordering::Release);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;
    use crate::painter::run_painter;
    use crate::pruner::{row_ranges, run_band, BandLinks};
    use crate::testutil::recursive_backtracker;

    /// Runs the full M1 pipeline (pruners + painter + walker) on a
    /// generated perfect maze and checks the result verifies.
    fn solve_with_m1(grid: Arc<CellGrid>, bands: usize) -> Vec<Direction> {
        let ranges = row_ranges(grid.height, bands);
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
                scope.spawn(move || {
                    run_band(&grid, row_start, row_end, protect, BandLinks::default(), stop_ref);
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

    #[test]
    fn solves_a_small_generated_maze() {
        let grid = Arc::new(recursive_backtracker(12, 12, Some(21)));
        let path = solve_with_m1(Arc::clone(&grid), 3);
        let maze = Maze::from_grid_arc(grid);
        assert!(maze.check_solution(&path));
    }

    #[test]
    fn solves_a_single_band_maze() {
        // bands=1 means no cross-band rings are ever exercised, just the
        // painter/walker interaction.
        let grid = Arc::new(recursive_backtracker(8, 8, Some(22)));
        let path = solve_with_m1(Arc::clone(&grid), 1);
        let maze = Maze::from_grid_arc(grid);
        assert!(maze.check_solution(&path));
    }

    #[test]
    fn solves_a_straight_corridor_without_painter_help() {
        // No junctions at all: the walker should reach `end` on its own,
        // never needing to fall back to the painted suffix.
        // width 1 leaves every cell with exactly one live neighbor in
        // each direction already, since a fresh grid has no wall bits set.
        let grid = Arc::new(CellGrid::new(6, 1));
        let stop = AtomicBool::new(false);
        let path = run_walker(&grid, &stop);
        assert_eq!(path.len(), 5);
        assert!(stop.load(Ordering::Acquire));
    }
}
