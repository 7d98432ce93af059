//! The packed cell grid: one atomic 32-bit word per cell, plus the pure
//! move/branch queries built on top of it.
//!
//! Every bit in a cell word is only ever set, never cleared, once the maze
//! is loaded. That monotonicity is what lets most queries below use
//! [`Ordering::Relaxed`] for reads and fetch-or writes: a worker observing a
//! stale "not yet set" value just repeats work it would otherwise have
//! skipped, and will see the bit the next time it looks.
//!
//! The reverse-parent tag is the one exception: a reconstructor walking the
//! painted chain back to `end` reads tags on cells *other than* the one
//! that gated its loop, so Relaxed monotonicity alone isn't enough to
//! guarantee those other cells' tags are visible yet. [`CellGrid::set_reverse_tag`]
//! publishes with `Release`, and [`CellGrid::is_reverse_tagged_acquire`] is
//! the matching `Acquire` read a reconstructor must use to gate entry into
//! the tag chain; once that one synchronizes, every tag written earlier in
//! the painter's program order is visible too, and plain Relaxed reads of
//! `reverse_tag` suffice for the rest of the walk. The solver's completion
//! flags (see `solver::Flags`) need the same kind of acquire/release to
//! publish everything a winning worker wrote before it flipped the flag.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::position::{Direction, Position};

bitflags::bitflags! {
    /// The low, loader-written bits of a cell word: the two wall flags.
    /// Kept as a `bitflags!` type purely for ergonomic construction in the
    /// loader and in tests; the live grid stores these bits packed into the
    /// same atomic word as the ephemeral marker flags below.
    #[derive(Default)]
    pub struct WallBits: u32 {
        const EAST = 0x01;
        const SOUTH = 0x02;
    }
}

/// Cell is proven not to lie on any start-to-end path (set by pruners).
pub const DEAD: u32 = 0x04;
/// Cell is the M1 walker/painter meeting point. Legacy/optional bit, kept
/// for parity with the reference implementation's `OVERLAP_BIT`.
pub const OVERLAP: u32 = 0x08;
/// The branch into this cell is claimed by a forward M2 worker.
pub const BRANCH_OCCUPIED: u32 = 0x10;
/// The branch into this cell has been exhausted by M2 workers.
pub const BRANCH_DEAD: u32 = 0x20;

/// Mask and shift for the reverse-search (painter / reverse DFS) parent tag.
const REVERSE_TAG_SHIFT: u32 = 24;
const REVERSE_TAG_MASK: u32 = 0x0F << REVERSE_TAG_SHIFT;
/// Mask and shift for the forward-search parent tag (reference BFS only).
const FORWARD_TAG_SHIFT: u32 = 28;
const FORWARD_TAG_MASK: u32 = 0x0F << FORWARD_TAG_SHIFT;

/// One-hot nibble encoding for a parent-direction tag: which direction
/// points back toward the cell that discovered this one.
fn tag_bit(dir: Direction) -> u32 {
    match dir {
        Direction::East => 0x1,
        Direction::West => 0x2,
        Direction::South => 0x4,
        Direction::North => 0x8,
        Direction::Uninitialized => panic!("cannot tag with an uninitialized direction"),
    }
}

fn bit_to_dir(nibble: u32) -> Direction {
    match nibble {
        0x1 => Direction::East,
        0x2 => Direction::West,
        0x4 => Direction::South,
        0x8 => Direction::North,
        0x0 => Direction::Uninitialized,
        _ => panic!("corrupt parent-direction nibble: {:#x}", nibble),
    }
}

/// The set of open directions out of a cell, as an ordered fixed-size
/// structure (no heap allocation). Mirrors the reference implementation's
/// `ListDirection`: four independent direction slots rather than a `Vec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirSet {
    north: bool,
    south: bool,
    east: bool,
    west: bool,
}

impl DirSet {
    pub fn len(&self) -> usize {
        self.north as usize + self.south as usize + self.east as usize + self.west as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
            Direction::Uninitialized => false,
        }
    }

    pub fn insert(&mut self, dir: Direction) {
        match dir {
            Direction::North => self.north = true,
            Direction::South => self.south = true,
            Direction::East => self.east = true,
            Direction::West => self.west = true,
            Direction::Uninitialized => {}
        }
    }

    pub fn remove(&mut self, dir: Direction) {
        match dir {
            Direction::North => self.north = false,
            Direction::South => self.south = false,
            Direction::East => self.east = false,
            Direction::West => self.west = false,
            Direction::Uninitialized => {}
        }
    }

    /// The first open direction in fixed N, E, S, W scan order, or
    /// [`Direction::Uninitialized`] if none remain.
    pub fn first(&self) -> Direction {
        if self.north {
            Direction::North
        } else if self.east {
            Direction::East
        } else if self.south {
            Direction::South
        } else if self.west {
            Direction::West
        } else {
            Direction::Uninitialized
        }
    }

    /// Iterate the open directions in fixed N, E, S, W order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        crate::position::ALL_DIRECTIONS
            .iter()
            .copied()
            .filter(move |d| self.contains(*d))
    }
}

/// The height x width array of atomic cell words, plus the start/end
/// positions implied by the file format (§6): start on the top row, end on
/// the bottom row, both in the middle column.
pub struct CellGrid {
    cells: Vec<AtomicU32>,
    pub height: usize,
    pub width: usize,
}

impl CellGrid {
    /// Allocates a grid with every bit cleared (no walls, no markers).
    /// Callers load wall bits afterward via [`CellGrid::set_wall_bits`].
    pub fn new(height: usize, width: usize) -> Self {
        let mut cells = Vec::with_capacity(height * width);
        cells.resize_with(height * width, || AtomicU32::new(0));
        CellGrid {
            cells,
            height,
            width,
        }
    }

    pub fn start(&self) -> Position {
        Position::new(0, (self.width / 2) as i64)
    }

    pub fn end(&self) -> Position {
        Position::new((self.height - 1) as i64, (self.width / 2) as i64)
    }

    fn in_bounds(&self, p: Position) -> bool {
        p.row >= 0 && p.col >= 0 && (p.row as usize) < self.height && (p.col as usize) < self.width
    }

    fn index(&self, p: Position) -> usize {
        debug_assert!(self.in_bounds(p), "position {} out of bounds", p);
        p.row as usize * self.width + p.col as usize
    }

    pub fn get_cell(&self, p: Position) -> u32 {
        self.cells[self.index(p)].load(Ordering::Relaxed)
    }

    pub fn set_cell(&self, p: Position, val: u32) {
        self.cells[self.index(p)].store(val, Ordering::Relaxed);
    }

    pub fn or_flag(&self, p: Position, mask: u32) -> u32 {
        self.cells[self.index(p)].fetch_or(mask, Ordering::Relaxed)
    }

    /// Sets the wall bits for a cell during load. Not used after load
    /// begins; walls are immutable thereafter except for the pruners'
    /// monotonic wall-closing (also an OR, never a clear).
    pub fn set_wall_bits(&self, p: Position, bits: WallBits) {
        self.or_flag(p, bits.bits());
    }

    pub fn set_east_wall(&self, p: Position) {
        self.or_flag(p, WallBits::EAST.bits());
    }

    pub fn set_south_wall(&self, p: Position) {
        self.or_flag(p, WallBits::SOUTH.bits());
    }

    /// True iff the wall on the `dir` side of `p` is open. For north/west
    /// this inspects the *neighbor's* south/east wall bit, since walls are
    /// stored on whichever cell is south/east of the boundary. Returns
    /// false at the top/left edge without constructing an out-of-range
    /// position.
    pub fn can_move(&self, p: Position, dir: Direction) -> bool {
        match dir {
            Direction::North => {
                if p.row == 0 {
                    false
                } else {
                    self.get_cell(p.step(Direction::North)) & WallBits::SOUTH.bits() == 0
                }
            }
            Direction::South => self.get_cell(p) & WallBits::SOUTH.bits() == 0,
            Direction::East => self.get_cell(p) & WallBits::EAST.bits() == 0,
            Direction::West => {
                if p.col == 0 {
                    false
                } else {
                    self.get_cell(p.step(Direction::West)) & WallBits::EAST.bits() == 0
                }
            }
            Direction::Uninitialized => panic!("cannot query an uninitialized direction"),
        }
    }

    /// The open directions out of `p`, in fixed N, E, S, W scan order.
    pub fn get_moves(&self, p: Position) -> DirSet {
        let mut moves = DirSet::default();
        for &d in &crate::position::ALL_DIRECTIONS {
            if self.can_move(p, d) {
                moves.insert(d);
            }
        }
        moves
    }

    /// Same set as [`CellGrid::get_moves`], wrapped with a fair round-robin
    /// rotor seeded from `seed & 3` so that different workers prefer a
    /// different starting direction and don't lock-step on the same branch.
    pub fn get_branches(&self, p: Position, seed: u32) -> Branches {
        Branches::new(self.get_moves(p), seed)
    }

    pub fn is_dead(&self, p: Position) -> bool {
        self.get_cell(p) & DEAD != 0
    }

    pub fn set_dead(&self, p: Position) {
        self.or_flag(p, DEAD);
    }

    pub fn is_overlap(&self, p: Position) -> bool {
        self.get_cell(p) & OVERLAP != 0
    }

    pub fn set_overlap(&self, p: Position) {
        self.or_flag(p, OVERLAP);
    }

    pub fn is_branch_occupied(&self, p: Position) -> bool {
        self.get_cell(p) & BRANCH_OCCUPIED != 0
    }

    pub fn set_branch_occupied(&self, p: Position) {
        self.or_flag(p, BRANCH_OCCUPIED);
    }

    /// Tests whether the branch *into* `p.step(dir)` (i.e. the edge leaving
    /// `p` toward `dir`) is occupied, by inspecting the neighbor cell.
    pub fn check_branch_occupied(&self, p: Position, dir: Direction) -> bool {
        self.is_branch_occupied(p.step(dir))
    }

    pub fn is_branch_dead(&self, p: Position) -> bool {
        self.get_cell(p) & BRANCH_DEAD != 0
    }

    pub fn set_branch_dead(&self, p: Position) {
        self.or_flag(p, BRANCH_DEAD);
    }

    pub fn check_branch_dead(&self, p: Position, dir: Direction) -> bool {
        self.is_branch_dead(p.step(dir))
    }

    /// Reads the reverse-search parent tag on `p`: the direction back
    /// toward the cell that discovered it. `Uninitialized` means unvisited.
    pub fn reverse_tag(&self, p: Position) -> Direction {
        bit_to_dir((self.get_cell(p) & REVERSE_TAG_MASK) >> REVERSE_TAG_SHIFT)
    }

    pub fn is_reverse_tagged(&self, p: Position) -> bool {
        self.get_cell(p) & REVERSE_TAG_MASK != 0
    }

    /// Same test as [`CellGrid::is_reverse_tagged`], but with an `Acquire`
    /// load instead of the usual Relaxed one. A reconstructor must use this
    /// to gate entry into a walk over painted tags: synchronizing with the
    /// `Release` in [`CellGrid::set_reverse_tag`] on this very cell makes
    /// every tag the painter wrote earlier in its own program order (which,
    /// by BFS order, is every tag on a cell closer to `end` than this one)
    /// visible too, so the rest of the chain can be read with plain Relaxed
    /// loads.
    pub fn is_reverse_tagged_acquire(&self, p: Position) -> bool {
        self.cells[self.index(p)].load(Ordering::Acquire) & REVERSE_TAG_MASK != 0
    }

    /// Records that `p` was reached from `came_from` by the painter or a
    /// reverse DFS worker. Idempotent: only the first setter's direction
    /// sticks, since bits are never cleared and tags are written once a
    /// cell is first discovered. Publishes with `Release` so a matching
    /// [`CellGrid::is_reverse_tagged_acquire`] can synchronize with it.
    pub fn set_reverse_tag(&self, p: Position, came_from: Direction) {
        self.cells[self.index(p)].fetch_or(tag_bit(came_from) << REVERSE_TAG_SHIFT, Ordering::Release);
    }

    pub fn forward_tag(&self, p: Position) -> Direction {
        bit_to_dir((self.get_cell(p) & FORWARD_TAG_MASK) >> FORWARD_TAG_SHIFT)
    }

    pub fn is_forward_tagged(&self, p: Position) -> bool {
        self.get_cell(p) & FORWARD_TAG_MASK != 0
    }

    /// Used only by the reference BFS oracle (see `reference.rs`).
    pub fn set_forward_tag(&self, p: Position, came_from: Direction) {
        self.or_flag(p, tag_bit(came_from) << FORWARD_TAG_SHIFT);
    }
}

/// A `get_moves` result wrapped with an internal rotor index, used by the
/// bidirectional DFS workers to pick a fair, round-robin starting
/// direction per worker rather than always preferring North.
#[derive(Debug, Clone)]
pub struct Branches {
    moves: DirSet,
    rotor: usize,
}

impl Branches {
    fn new(moves: DirSet, seed: u32) -> Self {
        Branches {
            moves,
            rotor: (seed & 3) as usize,
        }
    }

    /// Builds a `Branches` from an already-computed `DirSet` (for example
    /// one with the arrival direction already removed by
    /// [`crate::choice::follow_corridor`]), rather than recomputing
    /// `get_moves` from scratch. Used by the M2 worker pools when seeding
    /// the frame for a cell they just walked a corridor into.
    pub fn from_moves(moves: DirSet, seed: u32) -> Self {
        Branches::new(moves, seed)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn remove(&mut self, dir: Direction) {
        self.moves.remove(dir);
    }

    /// The candidate directions in rotor order starting at `self.rotor`,
    /// rather than the fixed N, E, S, W order `DirSet` iterates in.
    fn rotor_order(&self) -> [Direction; 4] {
        let mut order = crate::position::ALL_DIRECTIONS;
        order.rotate_left(self.rotor);
        order
    }

    /// Advances the rotor by one slot so the next call starts from a
    /// different direction, keeping workers from converging on the same
    /// preferred branch call after call.
    pub fn advance_rotor(&mut self) {
        self.rotor = (self.rotor + 1) & 3;
    }

    /// Picks the next branch out of `at` per the fair selector (§4.8):
    /// skip directions this worker has already removed; among what
    /// remains, skip any the grid marks globally dead; remember the first
    /// alive-but-occupied direction as a fallback; claim and return the
    /// first alive, unoccupied direction. If every alive direction is
    /// occupied, return the fallback *without* claiming it. If no alive
    /// direction exists at all, return `Uninitialized`.
    pub fn next(&mut self, at: Position, grid: &CellGrid) -> Direction {
        self.advance_rotor();
        let mut fallback = Direction::Uninitialized;

        for dir in self.rotor_order() {
            if !self.moves.contains(dir) {
                continue;
            }
            if grid.check_branch_dead(at, dir) {
                self.moves.remove(dir);
                continue;
            }
            if grid.check_branch_occupied(at, dir) {
                if fallback == Direction::Uninitialized {
                    fallback = dir;
                }
                continue;
            }
            grid.set_branch_occupied(at.step(dir));
            return dir;
        }

        fallback
    }
}
