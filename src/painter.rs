//! M1's reverse painter: a breadth-first search that starts at the maze's
//! end and tags every reachable cell with a one-hot nibble pointing back
//! toward its discoverer. The forward corridor walker stops the instant it
//! steps onto a painted cell and splices the remainder of the path off the
//! painter's tags, instead of continuing its own search all the way to the
//! end.
//!
//! Grounded on the reference solver's `walkThread_BFS_BT`: a queue-driven
//! BFS from the maze end, skipping cells the pruners have already marked
//! dead, that exits early the moment it reaches the maze start (at which
//! point every cell on *a* start-to-end path is necessarily painted).

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cell::CellGrid;
use crate::position::Direction;

/// Scan order used while expanding a cell's neighbors, distinct from
/// `DirSet`'s fixed N,E,S,W enumeration so that the painted tree this
/// produces is its own deterministic shape, independent of the order
/// `get_moves` happens to iterate in.
const SCAN_ORDER: [Direction; 4] = [
    Direction::South,
    Direction::West,
    Direction::East,
    Direction::North,
];

/// Runs the reverse painter to completion: either it exhausts everything
/// reachable from `end`, it reaches `start` (proof the maze is connected
/// and every relevant cell is now tagged), or `stop` is raised by another
/// worker finishing first.
pub fn run_painter(grid: &Arc<CellGrid>, stop: &AtomicBool) {
    let start = grid.start();
    let end = grid.end();

    let mut visited = HashSet::new();
    visited.insert(end);
    let mut queue = VecDeque::new();
    queue.push_back(end);

    while let Some(cur) = queue.pop_front() {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        if grid.is_dead(cur) {
            continue;
        }
        if cur == start {
            return;
        }

        let moves = grid.get_moves(cur);
        for dir in SCAN_ORDER {
            if !moves.contains(dir) {
                continue;
            }
            let next = cur.step(dir);
            if visited.insert(next) {
                grid.set_reverse_tag(next, dir.reverse());
                queue.push_back(next);
            }
        }

        if queue.len() % 1024 == 0 {
            std::thread::yield_now();
        }
    }
}
