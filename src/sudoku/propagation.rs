#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint engine.
//!
//! One propagation step sweeps the grid for naked singles, cells whose
//! candidate set has exactly one member, and fills them immediately.
//! Filling a cell shrinks the candidate sets of its peers (candidates are
//! recomputed from row, column and box occupancy, so elimination is
//! implicit), which may expose further naked singles. The sweep repeats
//! until the grid is full, a contradiction surfaces, or no deterministic
//! progress remains and the search has to branch.

use crate::sudoku::grid::{CELL_COUNT, Grid};

/// What a propagation fixpoint concluded about a branch-owned grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Every cell is filled; the grid is a solution.
    Solved,
    /// No naked single remains. The payload is the cell to branch on:
    /// the empty cell with the fewest candidates, lowest index on ties.
    Stalled(usize),
    /// Some empty cell has no candidate left. The branch is a dead end;
    /// this is expected traffic, not a fault.
    Contradiction,
}

/// Runs naked-single filling and peer elimination to fixpoint on `grid`.
///
/// The grid must be exclusively owned by the calling branch; placements
/// are written through it directly.
pub fn propagate(grid: &mut Grid) -> Propagation {
    loop {
        let mut placed = false;
        // Fewest-candidates empty cell seen this sweep, for branch selection.
        let mut branch: Option<(usize, u32)> = None;

        for cell in 0..CELL_COUNT {
            if grid.value(cell) != 0 {
                continue;
            }
            let candidates = grid.candidates(cell);
            match candidates.len() {
                0 => return Propagation::Contradiction,
                1 => {
                    if let Some(digit) = candidates.sole() {
                        grid.set(cell, digit);
                        placed = true;
                    }
                }
                n => {
                    if branch.is_none_or(|(_, fewest)| n < fewest) {
                        branch = Some((cell, n));
                    }
                }
            }
        }

        // Anything placed this sweep may have created new singles, and it
        // invalidates the branch-cell pick; sweep again from a clean slate.
        if !placed {
            return match branch {
                None => Propagation::Solved,
                Some((cell, _)) => Propagation::Stalled(cell),
            };
        }
    }
}
