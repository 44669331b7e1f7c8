//! Rejection reasons raised by the admission gate.
//!
//! These cover malformed input only. A contradiction discovered *during*
//! search is a normal branch outcome, not an error, and never appears here.

use std::fmt;
use thiserror::Error;

/// The minimum number of clues a uniquely solvable 9x9 puzzle can have.
pub const MIN_CLUES: usize = 17;

/// A row, column or box, for naming the location of a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A horizontal line of nine cells, indexed 0..=8 top to bottom.
    Row(usize),
    /// A vertical line of nine cells, indexed 0..=8 left to right.
    Column(usize),
    /// A 3x3 sub-grid, indexed 0..=8 in reading order.
    Box(usize),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Column(i) => write!(f, "column {i}"),
            Self::Box(i) => write!(f, "box {i}"),
        }
    }
}

/// Why a value sequence was refused admission as a puzzle.
///
/// Raised synchronously by grid construction; a caller holding a rejected
/// input must re-prompt rather than attempt to solve.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidPuzzle {
    /// The input did not contain exactly 81 cells.
    #[error("puzzle has {0} cells, expected 81")]
    WrongLength(usize),

    /// A cell held a value outside 0..=9.
    #[error("cell {cell} holds {value}, outside 0..=9")]
    ValueOutOfRange {
        /// Flat index of the offending cell.
        cell: usize,
        /// The out-of-range value.
        value: u8,
    },

    /// The same non-zero value appeared twice in one unit.
    #[error("value {value} appears more than once in {unit}")]
    Duplicate {
        /// The duplicated digit.
        value: u8,
        /// The unit containing the duplicate.
        unit: Unit,
    },

    /// Fewer clues than any uniquely solvable puzzle can have.
    #[error("{given} clues given, at least {MIN_CLUES} required")]
    TooFewClues {
        /// How many clues the input carried.
        given: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_display() {
        assert_eq!(Unit::Row(3).to_string(), "row 3");
        assert_eq!(Unit::Column(0).to_string(), "column 0");
        assert_eq!(Unit::Box(8).to_string(), "box 8");
    }

    #[test]
    fn test_error_messages_name_the_violation() {
        let err = InvalidPuzzle::TooFewClues { given: 10 };
        assert_eq!(err.to_string(), "10 clues given, at least 17 required");

        let err = InvalidPuzzle::Duplicate {
            value: 5,
            unit: Unit::Row(2),
        };
        assert_eq!(err.to_string(), "value 5 appears more than once in row 2");
    }
}
