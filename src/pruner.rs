//! M1's parallel dead-end pruning: each worker owns a contiguous band of
//! rows and repeatedly collapses degree-1 cells to DEAD, closing the wall
//! toward their sole open neighbor. Cross-band reactions (a collapse that
//! drops a boundary cell to degree 1) are shipped to the neighbor band
//! through an [`SPSC ring`](crate::ring).
//!
//! Ambiguity resolved here (see `DESIGN.md`): the reference source feeds
//! a single shared inbox per band from both neighbors, which is only
//! single-producer if a band has at most one neighbor. To keep every ring
//! genuinely single-producer/single-consumer (§5: mixing producers is a
//! programmer error), each *boundary* between two adjacent bands gets its
//! own pair of rings, one per direction, rather than one inbox per band.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cell::CellGrid;
use crate::position::{Direction, Position};
use crate::ring::BandRing;

/// One pruner's view of its neighbors: a ring to push notifications to,
/// paired with the ring it drains them from, per boundary. `None` at the
/// top of the head band or the bottom of the tail band.
#[derive(Default)]
pub struct BandLinks {
    pub outgoing_above: Option<Arc<BandRing>>,
    pub incoming_above: Option<Arc<BandRing>>,
    pub outgoing_below: Option<Arc<BandRing>>,
    pub incoming_below: Option<Arc<BandRing>>,
}

/// Closes the wall bit between `p` and its unique remaining neighbor in
/// `dir`. Mirrors the reference pruner's "deactivate dead cell" switch:
/// which cell's bit gets set depends on which side of the pair owns it.
fn close_wall_toward(grid: &CellGrid, p: Position, dir: Direction) {
    match dir {
        Direction::North => grid.set_south_wall(p.step(Direction::North)),
        Direction::South => grid.set_south_wall(p),
        Direction::East => grid.set_east_wall(p),
        Direction::West => grid.set_east_wall(p.step(Direction::West)),
        Direction::Uninitialized => unreachable!("degree-1 collapse always has a direction"),
    }
}

/// Runs one pruner band to completion (i.e. until `stop` is observed).
///
/// `row_start..row_end` is this band's inclusive-exclusive row range.
/// `protect` is the one cell this band must never mark dead even at
/// degree <= 1 (start for the head band, end for the tail band, `None`
/// for a middle band that contains neither).
pub fn run_band(
    grid: &Arc<CellGrid>,
    row_start: usize,
    row_end: usize,
    protect: Option<Position>,
    links: BandLinks,
    stop: &AtomicBool,
) {
    let mut stack: Vec<Position> = Vec::with_capacity(2048);

    for row in row_start..row_end {
        for col in 0..grid.width {
            let p = Position::new(row as i64, col as i64);
            if Some(p) == protect {
                continue;
            }
            if grid.get_moves(p).len() <= 1 {
                stack.push(p);
            }
        }
    }

    let mut incoming = Position::default();

    while !stop.load(Ordering::Relaxed) {
        while let Some(p) = stack.pop() {
            if grid.is_dead(p) {
                continue;
            }
            grid.set_dead(p);

            let moves = grid.get_moves(p);
            let dir = moves.first();
            if dir == Direction::Uninitialized {
                // An isolated dead cell (degree 0): nothing to notify.
                continue;
            }

            let neighbor = p.step(dir);
            close_wall_toward(grid, p, dir);

            if Some(neighbor) == protect {
                continue;
            }

            if grid.get_moves(neighbor).len() <= 1 {
                if neighbor.row as usize >= row_start && (neighbor.row as usize) < row_end {
                    stack.push(neighbor);
                } else if (neighbor.row as usize) < row_start {
                    if let Some(ring) = &links.outgoing_above {
                        // A full ring is acceptable best-effort loss (§7):
                        // the neighbor band will rediscover this cell on
                        // its own next scan once the shared wall bit we
                        // just closed lowers its degree count again.
                        let _ = ring.push(neighbor);
                    }
                } else if let Some(ring) = &links.outgoing_below {
                    let _ = ring.push(neighbor);
                }
            }
        }

        if let Some(ring) = &links.incoming_above {
            while ring.pop(&mut incoming) {
                stack.push(incoming);
            }
        }
        if let Some(ring) = &links.incoming_below {
            while ring.pop(&mut incoming) {
                stack.push(incoming);
            }
        }

        std::thread::yield_now();
    }
}

/// Splits `height` rows into `bands` contiguous, near-equal ranges, the
/// same `chunk + leftover-remainder` distribution the reference pruner
/// uses so the first `remainder` bands absorb the extra row each.
pub fn row_ranges(height: usize, bands: usize) -> Vec<(usize, usize)> {
    assert!(bands > 0 && bands <= height, "need 1..=height bands");
    let chunk = height / bands;
    let remainder = height % bands;

    let mut ranges = Vec::with_capacity(bands);
    let mut start = 0;
    for i in 0..bands {
        let extra = if i < remainder { 1 } else { 0 };
        let end = start + chunk + extra;
        ranges.push((start, end));
        start = end;
    }
    debug_assert_eq!(start, height);
    ranges
}
