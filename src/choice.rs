//! The per-worker stack frame used by every corridor-following search:
//! the reference DFS oracle, the bidirectional M2 workers, and (via
//! `DirSet`) the M1 walker.
//!
//! The reference implementation keeps two near-identical structs here
//! (`Choice` for the single-threaded solvers, a second hand for the M2
//! workers); this unifies them into one `Junction` and discriminates by
//! whether `is_overlap` is meaningful in context.

use crate::cell::{Branches, CellGrid, DirSet};
use crate::position::{Direction, Position};

/// One frame of a depth-first search stack: the cell we're standing on,
/// the direction we arrived from, and the branches still worth trying.
#[derive(Debug, Clone)]
pub struct Junction {
    pub at: Position,
    pub from: Direction,
    pub branches: Branches,
    /// Set (forward workers only) when this cell already carried a
    /// reverse-search parent tag on arrival — a candidate meeting point.
    pub is_overlap: bool,
    /// The cell adjacent to this frame's parent that this frame's branch
    /// entered through, i.e. the one `set_branch_occupied`/
    /// `check_branch_dead` actually key off of. `None` for a root frame
    /// with no parent to report back to on backtrack.
    pub entry: Option<Position>,
    /// The direction most recently selected out of this frame, re-read by
    /// path reconstruction at any real junction the solution passes
    /// through (§4.7: "consult the next Junction frame... and take its
    /// recorded current branch").
    pub chosen: Direction,
}

impl Junction {
    pub fn new(at: Position, from: Direction, branches: Branches) -> Self {
        Junction {
            at,
            from,
            branches,
            is_overlap: false,
            entry: None,
            chosen: Direction::Uninitialized,
        }
    }

    pub fn is_dead_end(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Walks corridors (cells with exactly one open direction other than the
/// one just arrived from) starting from `at` in direction `dir`, stopping
/// at the first junction, dead end, or `stop_at`. Shared by the reference
/// DFS/BFS oracles and the M1 forward walker's non-concurrent bookkeeping.
///
/// Returns the landing position, the direction last arrived from, and the
/// `DirSet` of remaining choices there (empty at a dead end).
pub fn follow_corridor(
    grid: &CellGrid,
    at: Position,
    dir: Direction,
    stop_at: Position,
) -> (Position, Direction, DirSet) {
    let mut at = at.step(dir);
    let mut came_from = dir.reverse();

    loop {
        if at == stop_at {
            return (at, came_from, DirSet::default());
        }
        let mut choices = grid.get_moves(at);
        choices.remove(came_from);

        if choices.len() == 1 {
            let go_to = choices.first();
            at = at.step(go_to);
            came_from = go_to.reverse();
            continue;
        }
        return (at, came_from, choices);
    }
}
