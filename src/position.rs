//! Grid coordinates and cardinal directions.
//!
//! Mirrors the tiny, allocation-free value types at the leaves of the
//! solver: a `(row, col)` pair and the four cardinal moves plus a sentinel
//! "uninitialized" direction used by junction bookkeeping.

use std::fmt;

/// A cell coordinate. Row 0 is the top of the maze, col 0 is the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i64,
    pub col: i64,
}

impl Position {
    pub fn new(row: i64, col: i64) -> Self {
        Position { row, col }
    }

    /// Returns the neighboring position in `dir`.
    ///
    /// # Panics
    /// Panics if `dir` is [`Direction::Uninitialized`].
    pub fn step(self, dir: Direction) -> Position {
        match dir {
            Direction::North => Position::new(self.row - 1, self.col),
            Direction::South => Position::new(self.row + 1, self.col),
            Direction::East => Position::new(self.row, self.col + 1),
            Direction::West => Position::new(self.row, self.col - 1),
            Direction::Uninitialized => panic!("cannot step in an uninitialized direction"),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves, or the sentinel "no direction yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Uninitialized,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Uninitialized
    }
}

/// The fixed N, E, S, W scan order used wherever the spec calls for a
/// deterministic enumeration (the reverse painter, bidirectional DFS seeding).
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Swaps N<->S, E<->W.
    ///
    /// # Panics
    /// Panics on [`Direction::Uninitialized`] — reversing "no direction" is
    /// a programmer error, not a recoverable case.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Uninitialized => panic!("cannot reverse an uninitialized direction"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Uninitialized => "Uninitialized",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_back() {
        let p = Position::new(5, 5);
        for &d in &ALL_DIRECTIONS {
            assert_eq!(p.step(d).step(d.reverse()), p);
        }
    }

    #[test]
    fn reverse_is_involutive() {
        for &d in &ALL_DIRECTIONS {
            assert_eq!(d.reverse().reverse(), d);
        }
    }

    #[test]
    #[should_panic]
    fn reverse_uninitialized_panics() {
        Direction::Uninitialized.reverse();
    }

    #[test]
    #[should_panic]
    fn step_uninitialized_panics() {
        Position::default().step(Direction::Uninitialized);
    }

    #[test]
    fn equality_is_componentwise() {
        assert_eq!(Position::new(1, 2), Position::new(1, 2));
        assert_ne!(Position::new(1, 2), Position::new(2, 1));
    }
}
