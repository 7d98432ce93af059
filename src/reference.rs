//! Single-threaded BFS and DFS reference solvers.
//!
//! These exist purely as correctness oracles for the concurrent solvers
//! (§8, property 3: "pruning soundness... by comparing against a correct
//! single-threaded reference"). They are deliberately simple, cell-by-cell
//! textbook searches — no corridor-skipping, no shared state, no threads —
//! since their job is to be obviously correct, not fast.

use std::collections::{HashMap, VecDeque};

use crate::cell::CellGrid;
use crate::maze::Maze;
use crate::position::{Direction, Position};

/// Breadth-first search from `maze.start()` to `maze.end()`. Returns
/// `None` if no path exists (an unsolvable maze, §7).
///
/// The only reader/writer of the cell word's forward-search parent tag
/// (the 0xF0000000 nibble): this oracle discovers each cell exactly once,
/// so a plain `HashMap` would do the same job, but tagging the grid
/// directly exercises the bit the format reserves for it and lets
/// [`reconstruct_forward`] retrace the path the same way the painter's
/// reverse tags are retraced in `walker.rs`.
pub fn bfs_solve(maze: &Maze) -> Option<Vec<Direction>> {
    let grid = maze.grid();
    let start = maze.start();
    let end = maze.end();

    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut visited = std::collections::HashSet::new();
    visited.insert(start);

    while let Some(at) = queue.pop_front() {
        if at == end {
            return Some(reconstruct_forward(grid, start, end));
        }
        for dir in grid.get_moves(at).iter() {
            let next = at.step(dir);
            if visited.insert(next) {
                grid.set_forward_tag(next, dir.reverse());
                queue.push_back(next);
            }
        }
    }
    None
}

/// Depth-first search from `maze.start()` to `maze.end()`. Returns `None`
/// if no path exists.
pub fn dfs_solve(maze: &Maze) -> Option<Vec<Direction>> {
    let grid = maze.grid();
    let start = maze.start();
    let end = maze.end();

    let mut parent: HashMap<Position, (Position, Direction)> = HashMap::new();
    let mut visited = std::collections::HashSet::new();
    visited.insert(start);
    let mut stack = vec![start];

    while let Some(at) = stack.pop() {
        if at == end {
            return Some(reconstruct(&parent, start, end));
        }
        for dir in grid.get_moves(at).iter() {
            let next = at.step(dir);
            if visited.insert(next) {
                parent.insert(next, (at, dir));
                stack.push(next);
            }
        }
    }
    None
}

fn reconstruct(
    parent: &HashMap<Position, (Position, Direction)>,
    start: Position,
    end: Position,
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut at = end;
    while at != start {
        let (prev, dir) = parent
            .get(&at)
            .copied()
            .expect("reconstruction ran out of parent links before reaching start");
        path.push(dir);
        at = prev;
    }
    path.reverse();
    path
}

/// Retraces `bfs_solve`'s path by following the forward-search parent tag
/// it wrote on each cell, from `end` back to `start`, the same way the
/// painter's reverse tags are retraced in `walker.rs`.
fn reconstruct_forward(grid: &CellGrid, start: Position, end: Position) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut at = end;
    while at != start {
        // `forward_tag(at)` points back toward the parent that discovered
        // `at`; the step actually taken to reach `at` from that parent is
        // the opposite direction.
        let dir = grid.forward_tag(at);
        assert_ne!(
            dir,
            Direction::Uninitialized,
            "forward reconstruction ran out of parent tags before reaching start at {}",
            at
        );
        path.push(dir.reverse());
        at = at.step(dir);
    }
    path.reverse();
    path
}
