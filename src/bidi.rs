//! M2: bidirectional parallel depth-first search. A pool of forward
//! workers races from start, a pool of reverse workers races from end,
//! coordinating through the grid's BRANCH_OCCUPIED/BRANCH_DEAD bits (an
//! edge claim shared by both pools) and the reverse-parent tag nibble
//! (written only by the reverse pool here, not by a painter). Whichever
//! forward worker first reaches end, or first steps onto a cell the
//! reverse pool already tagged, wins; the winning reverse worker (if any)
//! hands its own stack across for the second half of the path.
//!
//! This module has no single direct counterpart in the reference source
//! (whose multithreaded solver uses the BFS-painter design M1 generalizes,
//! not a bidirectional DFS); it is built from the single-threaded
//! `SkippingMazeSolver`'s corridor-following shape (`Choice`/`follow`,
//! already generalized into [`crate::choice`]) plus the fair round-robin
//! selector and shared atomic bits laid out for this strategy.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::cell::{Branches, CellGrid};
use crate::choice::{follow_corridor, Junction};
use crate::position::{Direction, Position};

/// The shared coordination state between every forward and reverse
/// worker: who won, and (if the win came from an overlap rather than a
/// direct hit on `end`) where.
///
/// `found_solution` and `found_overlap` are this module's only fenced
/// atomics (release on publish, acquire on observation); everything else
/// in `Coordination` rides along on the same release, since a release
/// store makes every earlier write in program order visible to whoever
/// acquires it. (The reverse-parent tag in `cell.rs` has its own,
/// separate release/acquire pair for the same reason.)
pub struct Coordination {
    found_solution: AtomicBool,
    found_overlap: AtomicBool,
    has_overlap: AtomicBool,
    overlap_row: AtomicI64,
    overlap_col: AtomicI64,
}

impl Default for Coordination {
    fn default() -> Self {
        Coordination {
            found_solution: AtomicBool::new(false),
            found_overlap: AtomicBool::new(false),
            has_overlap: AtomicBool::new(false),
            overlap_row: AtomicI64::new(0),
            overlap_col: AtomicI64::new(0),
        }
    }
}

impl Coordination {
    pub fn is_solution_found(&self) -> bool {
        self.found_solution.load(Ordering::Acquire)
    }

    /// Attempts to become the forward pool's winner. At most one caller
    /// across every forward worker ever sees `true`.
    fn try_claim_solution(&self) -> bool {
        self.found_solution
            .compare_exchange(false, true, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    /// Publishes the overlap cell, then wins `found_solution`. Must be
    /// called together so the position write is visible to anyone who
    /// later observes `found_solution` with acquire.
    fn claim_solution_with_overlap(&self, at: Position) -> bool {
        self.overlap_row.store(at.row, Ordering::Relaxed);
        self.overlap_col.store(at.col, Ordering::Relaxed);
        self.has_overlap.store(true, Ordering::Relaxed);
        self.try_claim_solution()
    }

    /// `true` once a forward winner has published an overlap cell (as
    /// opposed to winning by walking directly onto `end`). Only
    /// meaningful after [`Coordination::is_solution_found`] is `true`.
    fn has_overlap(&self) -> bool {
        self.has_overlap.load(Ordering::Relaxed)
    }

    fn overlap_position(&self) -> Position {
        Position::new(
            self.overlap_row.load(Ordering::Relaxed),
            self.overlap_col.load(Ordering::Relaxed),
        )
    }

    fn try_claim_overlap(&self) -> bool {
        self.found_overlap
            .compare_exchange(false, true, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    pub fn found_overlap(&self) -> bool {
        self.found_overlap.load(Ordering::Acquire)
    }
}

/// Builds the root frame of a worker's stack: follows the straight
/// corridor out of `root` (if it has exactly one open direction) until
/// the first real junction, dead end, or `far_target`.
fn seed_junction(grid: &CellGrid, root: Position, far_target: Position, seed: u32) -> Junction {
    let moves = grid.get_moves(root);
    if moves.len() == 1 {
        let d = moves.first();
        let (landed, came_from, choices) = follow_corridor(grid, root, d, far_target);
        let mut frame = Junction::new(landed, came_from, Branches::from_moves(choices, seed));
        frame.entry = Some(root.step(d));
        frame
    } else {
        Junction::new(root, Direction::Uninitialized, grid.get_branches(root, seed))
    }
}

/// `true` iff `at` was tagged by the reverse pool from a side other than
/// the one this worker just arrived from — a genuine meeting point rather
/// than incidental overlap along the same corridor.
fn is_meeting_point(grid: &CellGrid, at: Position, came_from: Direction) -> bool {
    grid.is_reverse_tagged(at) && grid.reverse_tag(at) != came_from
}

/// Runs one forward DFS worker. Returns the full solution path if this
/// worker is the one that wins `found_solution`, `None` otherwise
/// (exhausted its own stack, or another worker won first).
pub fn run_forward_worker(
    grid: &Arc<CellGrid>,
    coord: &Coordination,
    seed: u32,
) -> Option<Vec<Direction>> {
    let start = grid.start();
    let end = grid.end();

    let mut root = seed_junction(grid, start, end, seed);
    if root.at != end {
        root.is_overlap = is_meeting_point(grid, root.at, root.from);
    }
    let mut stack = vec![root];

    while !stack.is_empty() && !coord.is_solution_found() {
        let at = stack.last().unwrap().at;

        if at == end {
            if coord.try_claim_solution() {
                return Some(reconstruct_forward(grid, start, end, &stack));
            }
            return None;
        }
        if stack.last().unwrap().is_overlap {
            if coord.claim_solution_with_overlap(at) {
                return Some(reconstruct_forward(grid, start, at, &stack));
            }
            return None;
        }

        let frame = stack.last_mut().unwrap();
        let d = frame.branches.next(frame.at, grid);
        if d == Direction::Uninitialized {
            let popped = stack.pop().unwrap();
            if let Some(entry) = popped.entry {
                grid.set_branch_dead(entry);
            }
            continue;
        }
        frame.chosen = d;

        let entry = frame.at.step(d);
        let (landed, came_from, choices) = follow_corridor(grid, frame.at, d, end);
        let mut next = Junction::new(landed, came_from, Branches::from_moves(choices, seed ^ stack.len() as u32));
        next.entry = Some(entry);
        if landed != end {
            next.is_overlap = is_meeting_point(grid, landed, came_from);
        }
        stack.push(next);
    }

    None
}

/// Runs one reverse DFS worker. Returns `Some(stack)` only if this worker
/// is the one that successfully unwinds to the published overlap cell and
/// wins `found_overlap`; every other reverse worker returns `None`.
pub fn run_reverse_worker(
    grid: &Arc<CellGrid>,
    coord: &Coordination,
    seed: u32,
) -> Option<Vec<Junction>> {
    let start = grid.start();
    let end = grid.end();

    let mut stack = vec![seed_junction(grid, end, start, seed)];

    while !stack.is_empty() && !coord.is_solution_found() {
        let frame = stack.last_mut().unwrap();
        let d = frame.branches.next(frame.at, grid);
        if d == Direction::Uninitialized {
            let popped = stack.pop().unwrap();
            if let Some(entry) = popped.entry {
                grid.set_branch_dead(entry);
            }
            continue;
        }
        frame.chosen = d;

        let entry = frame.at.step(d);
        let (landed, came_from, choices) = follow_corridor(grid, frame.at, d, start);
        if !grid.is_reverse_tagged(landed) {
            grid.set_reverse_tag(landed, came_from);
        }
        let mut next = Junction::new(landed, came_from, Branches::from_moves(choices, seed ^ stack.len() as u32));
        next.entry = Some(entry);
        stack.push(next);
    }

    if !coord.is_solution_found() || !coord.has_overlap() {
        return None;
    }

    let overlap = coord.overlap_position();
    while stack.last().map(|j| j.at) != Some(overlap) {
        if stack.pop().is_none() {
            // This worker's stack never passed through the published
            // overlap cell: some other reverse worker discovered it.
            return None;
        }
    }

    if coord.try_claim_overlap() {
        Some(stack)
    } else {
        None
    }
}

/// Forward half of path reconstruction (§4.7): walk the physical maze
/// from `start` toward `target` (`end`, or the overlap cell), consulting
/// the stack's recorded choices whenever more than one move remains.
fn reconstruct_forward(
    grid: &CellGrid,
    start: Position,
    target: Position,
    stack: &[Junction],
) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut curr = start;
    let mut came_from = Direction::Uninitialized;
    let mut frame_idx = 0;

    while curr != target {
        let mut moves = grid.get_moves(curr);
        if came_from != Direction::Uninitialized {
            moves.remove(came_from);
        }

        let go_to = match moves.len() {
            0 => panic!(
                "forward reconstruction hit a dead end at {} on the claimed solution path",
                curr
            ),
            1 => moves.first(),
            _ => {
                let frame = stack.get(frame_idx).unwrap_or_else(|| {
                    panic!("forward reconstruction ran out of junction frames at {}", curr)
                });
                frame_idx += 1;
                frame.chosen
            }
        };

        path.push(go_to);
        curr = curr.step(go_to);
        came_from = go_to.reverse();
    }

    path
}

/// Reverse half of path reconstruction (§4.7): walk the physical maze
/// from the overlap cell toward `end`, consulting the reverse worker's
/// stack *in reverse iteration order* (the frame nearest the overlap cell
/// first) at every real junction it recorded. The stack was built walking
/// away from `end`, so the frame closest to the overlap sits at the top;
/// retracing the physical path back toward `end` reads that frame first
/// and takes the direction that points back toward its parent (`from`),
/// not the direction it chose going deeper away from `end` (`chosen`).
fn reconstruct_reverse(grid: &CellGrid, overlap: Position, end: Position, stack: &[Junction]) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut curr = overlap;
    let mut came_from = Direction::Uninitialized;
    let mut frames = stack.iter().rev();

    while curr != end {
        let mut moves = grid.get_moves(curr);
        if came_from != Direction::Uninitialized {
            moves.remove(came_from);
        }

        let go_to = match moves.len() {
            0 => panic!(
                "reverse reconstruction hit a dead end at {} on the claimed solution path",
                curr
            ),
            1 => moves.first(),
            _ => {
                let frame = frames
                    .next()
                    .unwrap_or_else(|| panic!("reverse reconstruction ran out of junction frames at {}", curr));
                frame.from
            }
        };

        path.push(go_to);
        curr = curr.step(go_to);
        came_from = go_to.reverse();
    }

    path
}

/// Runs the full M2 strategy: `forward_workers` forward DFS threads and
/// `reverse_workers` reverse DFS threads, racing to a single solution.
pub fn solve(grid: &Arc<CellGrid>, forward_workers: usize, reverse_workers: usize) -> Vec<Direction> {
    assert!(forward_workers > 0, "M2 needs at least one forward worker");

    let coord = Coordination::default();
    let reverse_handoff: Mutex<Option<Vec<Junction>>> = Mutex::new(None);
    let mut forward_path: Option<Vec<Direction>> = None;

    std::thread::scope(|scope| {
        let mut forward_handles = Vec::with_capacity(forward_workers);
        for i in 0..forward_workers {
            let grid = Arc::clone(grid);
            let coord = &coord;
            forward_handles.push(scope.spawn(move || run_forward_worker(&grid, coord, i as u32)));
        }

        let mut reverse_handles = Vec::with_capacity(reverse_workers);
        for i in 0..reverse_workers {
            let grid = Arc::clone(grid);
            let coord = &coord;
            let handoff = &reverse_handoff;
            reverse_handles.push(scope.spawn(move || {
                if let Some(stack) = run_reverse_worker(&grid, coord, (i as u32).wrapping_add(0x9e37_79b9)) {
                    *handoff.lock().unwrap() = Some(stack);
                }
            }));
        }

        for h in forward_handles {
            if let Some(path) = h.join().expect("forward worker panicked") {
                forward_path = Some(path);
            }
        }
        for h in reverse_handles {
            h.join().expect("reverse worker panicked");
        }
    });

    // `forward_path` is `None` when every forward worker exhausted its
    // stack without anyone claiming `found_solution`: the maze has no
    // path from start to end (§7, "no solution exists"). Report that as
    // an empty path rather than treating it as a protocol violation.
    let mut path = forward_path.unwrap_or_default();

    if coord.found_overlap() {
        let overlap = coord.overlap_position();
        let stack = reverse_handoff
            .into_inner()
            .unwrap()
            .expect("found_overlap set but no reverse stack was handed off");
        path.extend(reconstruct_reverse(grid, overlap, grid.end(), &stack));
    }

    path
}
