//! Perfect-maze generation, kept around purely as a test and benchmark
//! fixture generator.
//!
//! The concurrent solvers this crate exists for only ever *consume* a
//! pre-built maze (loaded per §6); they have no opinion about how one is
//! produced. But exercising them at the sizes the spec cares about (tens
//! of thousands of cells per side, §8 scenario S5) means generating large
//! perfect mazes on the fly rather than shipping multi-gigabyte fixture
//! files. This is a direct port of the recursive-backtracker carving
//! algorithm this crate's previous incarnation used for maze *generation*
//! as a product feature, now repurposed as test-only plumbing.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Lcg64Xsh32;

use crate::cell::CellGrid;
use crate::position::{Direction, Position};

fn rng_from_seed(seed: Option<u64>) -> Lcg64Xsh32 {
    match seed {
        Some(seed) => Lcg64Xsh32::seed_from_u64(seed),
        None => Lcg64Xsh32::from_entropy(),
    }
}

fn valid_direction(height: usize, width: usize, p: Position, dir: Direction) -> bool {
    match dir {
        Direction::North => p.row > 0,
        Direction::South => (p.row as usize) + 1 < height,
        Direction::East => (p.col as usize) + 1 < width,
        Direction::West => p.col > 0,
        Direction::Uninitialized => false,
    }
}

/// An undirected edge between a cell and one neighbor, canonicalized so
/// `(a, East)` and `(a.step(East), West)` hash identically.
fn canonical_edge(p: Position, dir: Direction) -> (Position, Direction) {
    match dir {
        Direction::North => (p.step(Direction::North), Direction::South),
        Direction::West => (p.step(Direction::West), Direction::East),
        _ => (p, dir),
    }
}

/// Carves a perfect maze (spanning tree: exactly one simple path between
/// any two cells) over a `height x width` grid using recursive
/// backtracking, and returns a fully-populated [`CellGrid`] with every
/// non-tree edge walled off.
///
/// Grounded directly on the teacher crate's `Maze::recursive_backtracker`,
/// generalized from a linear `Vec<Cell>` index to this crate's
/// `(row, col)`-addressed atomic grid.
pub fn recursive_backtracker(height: usize, width: usize, seed: Option<u64>) -> CellGrid {
    assert!(height > 0 && width > 0);
    let mut rng = rng_from_seed(seed);

    let mut linked: HashSet<(Position, Direction)> = HashSet::new();
    let mut visited: HashSet<Position> = HashSet::new();

    let start = Position::new(
        rng.gen_range(0, height as i64),
        rng.gen_range(0, width as i64),
    );
    visited.insert(start);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let mut candidates = Vec::with_capacity(4);
        for &dir in &crate::position::ALL_DIRECTIONS {
            if valid_direction(height, width, current, dir) {
                let neighbor = current.step(dir);
                if !visited.contains(&neighbor) {
                    candidates.push(dir);
                }
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let dir = candidates[rng.gen_range(0, candidates.len())];
        let neighbor = current.step(dir);
        linked.insert(canonical_edge(current, dir));
        visited.insert(neighbor);
        stack.push(neighbor);
    }

    let grid = CellGrid::new(height, width);
    for row in 0..height {
        for col in 0..width {
            let p = Position::new(row as i64, col as i64);
            if valid_direction(height, width, p, Direction::East)
                && !linked.contains(&canonical_edge(p, Direction::East))
            {
                grid.set_east_wall(p);
            }
            if valid_direction(height, width, p, Direction::South)
                && !linked.contains(&canonical_edge(p, Direction::South))
            {
                grid.set_south_wall(p);
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A perfect maze over `height*width` cells has exactly
    /// `height*width - 1` open edges (it's a tree).
    fn count_open_edges(grid: &CellGrid, height: usize, width: usize) -> usize {
        let mut count = 0;
        for row in 0..height {
            for col in 0..width {
                let p = Position::new(row as i64, col as i64);
                if grid.can_move(p, Direction::East) {
                    count += 1;
                }
                if grid.can_move(p, Direction::South) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn generates_a_spanning_tree() {
        let (h, w) = (12, 15);
        let grid = recursive_backtracker(h, w, Some(7));
        assert_eq!(count_open_edges(&grid, h, w), h * w - 1);
    }

    #[test]
    fn is_deterministic_given_a_seed() {
        let a = recursive_backtracker(10, 10, Some(123));
        let b = recursive_backtracker(10, 10, Some(123));
        for row in 0..10 {
            for col in 0..10 {
                let p = Position::new(row, col);
                assert_eq!(a.can_move(p, Direction::East), b.can_move(p, Direction::East));
                assert_eq!(a.can_move(p, Direction::South), b.can_move(p, Direction::South));
            }
        }
    }
}
