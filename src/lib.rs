//! A concurrent solver for very large perfect-path mazes.
//!
//! Two independent strategies solve the same loaded [`maze::Maze`]:
//!
//! - **M1** ([`solver::PrunerWalker`]): parallel row-band dead-end pruning
//!   plus a reverse BFS painter and a forward corridor walker racing to a
//!   meeting point.
//! - **M2** ([`solver::BidirectionalDfs`]): a pool of forward depth-first
//!   workers racing a pool of reverse depth-first workers, coordinating
//!   through atomic per-cell bits rather than message passing.
//!
//! Both strategies read and write the same [`cell::CellGrid`]: one packed
//! atomic word per cell, with every live bit set-only once the maze is
//! loaded (see that module for the ordering argument this relies on).

pub mod bidi;
pub mod cell;
pub mod choice;
pub mod loader;
pub mod maze;
pub mod painter;
pub mod position;
pub mod pruner;
pub mod reference;
pub mod render;
pub mod ring;
pub mod solver;
pub mod testutil;
pub mod walker;

pub use maze::Maze;
pub use solver::{BidirectionalDfs, PrunerWalker, Solver};
