#![deny(missing_docs)]
//! This crate provides a concurrent solver for standard 9x9 Sudoku puzzles.
//!
//! Solving combines constraint propagation (naked singles plus peer
//! elimination) with a backtracking search that races independently owned
//! branches on separate threads. The first branch to complete the grid
//! publishes the solution; every other branch stands down cooperatively.

/// The `sudoku` module contains the grid representation, the constraint
/// engine and the concurrent search orchestrator.
pub mod sudoku;
