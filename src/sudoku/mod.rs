#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Core solving engine for 9x9 Sudoku.
//!
//! The pipeline is: a caller-supplied sequence of 81 values is validated
//! into a [`grid::Grid`], the [`propagation`] engine narrows candidates
//! until the grid is solved, contradicted or stalled, and on a stall the
//! [`search`] orchestrator forks concurrent branches, one per extra
//! candidate at the most constrained cell. The first branch to finish
//! delivers a [`report::SolutionReport`] through a one-shot channel.

/// Packed candidate bitmask over the digits 1..=9.
pub mod candidate;
/// Flat comma-separated value input, as produced by board export tools.
pub mod csv;
/// Rejection reasons for puzzles that fail admission.
pub mod error;
/// The 81-cell board representation and its validation gate.
pub mod grid;
/// The constraint engine: naked singles and peer elimination to fixpoint.
pub mod propagation;
/// The solution report delivered to the caller.
pub mod report;
/// The concurrent backtracking orchestrator.
pub mod search;
