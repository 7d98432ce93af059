//! The maze itself: a loaded [`CellGrid`] plus the start/end cells implied
//! by the file format, and the solution verifier used by the driver.

use std::sync::Arc;

use crate::cell::CellGrid;
use crate::position::{Direction, Position};

/// An immutable-after-load maze: the atomic cell grid plus its fixed
/// start (top row, middle column) and end (bottom row, middle column).
///
/// Cheaply cloneable: internally an `Arc<CellGrid>`, so handing a `Maze`
/// to each solver worker thread is a refcount bump, not a copy of the
/// (potentially gigabytes-large) cell array.
#[derive(Clone)]
pub struct Maze {
    grid: Arc<CellGrid>,
}

impl Maze {
    pub fn from_grid(grid: CellGrid) -> Self {
        Maze {
            grid: Arc::new(grid),
        }
    }

    /// Wraps an already-shared grid, for callers (solver workers, tests)
    /// that built their `Arc<CellGrid>` directly rather than going through
    /// [`Maze::from_grid`].
    pub fn from_grid_arc(grid: Arc<CellGrid>) -> Self {
        Maze { grid }
    }

    pub fn grid(&self) -> &Arc<CellGrid> {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn start(&self) -> Position {
        self.grid.start()
    }

    pub fn end(&self) -> Position {
        self.grid.end()
    }

    /// Replays `path` from [`Maze::start`], requiring every move to cross
    /// an open wall, and checks that it lands exactly on [`Maze::end`].
    /// This is the sole correctness gate a verifier runs against any
    /// solver's output: well-formedness (§8, property 1), nothing more.
    pub fn check_solution(&self, path: &[Direction]) -> bool {
        let mut at = self.start();
        for &dir in path {
            if !self.grid.can_move(at, dir) {
                log::warn!(
                    "checkSolution: illegal move {} from {} (wall closed)",
                    dir,
                    at
                );
                return false;
            }
            at = at.step(dir);
        }
        let ok = at == self.end();
        if ok {
            log::info!("checkSolution({} elements): passed", path.len());
        } else {
            log::warn!(
                "checkSolution({} elements): FAILED, ended at {} not {}",
                path.len(),
                at,
                self.end()
            );
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Direction::*;

    fn straight_corridor(len: usize) -> Maze {
        // width 1 so start == (0,0) and end == (len-1, 0); a freshly
        // allocated grid has every wall bit unset already, so a width-1
        // column is already one connected corridor with nothing to open.
        let grid = CellGrid::new(len, 1);
        Maze::from_grid(grid)
    }

    #[test]
    fn valid_path_passes() {
        let maze = straight_corridor(5);
        let path = vec![South, South, South, South];
        assert!(maze.check_solution(&path));
    }

    #[test]
    fn path_through_closed_wall_fails() {
        let maze = straight_corridor(5);
        // Only 3 souths closes the loop one short of `end`, and the
        // remaining east crosses a wall that was never opened.
        let path = vec![South, South, East];
        assert!(!maze.check_solution(&path));
    }

    #[test]
    fn path_that_stops_short_fails() {
        let maze = straight_corridor(5);
        let path = vec![South, South];
        assert!(!maze.check_solution(&path));
    }

    #[test]
    fn empty_path_fails_unless_start_is_end() {
        let maze = straight_corridor(5);
        assert!(!maze.check_solution(&[]));

        let single = straight_corridor(1);
        assert!(single.check_solution(&[]));
    }
}
