#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for flat comma-separated puzzle files.
//!
//! The expected content is 81 integer values in reading order, `0` for an
//! empty cell, separated by commas and/or whitespace; line breaks are
//! allowed anywhere and lines starting with `#` are skipped. This module
//! only turns text into a value sequence — all Sudoku validation (length,
//! range, duplicates, clue count) happens at grid construction, the sole
//! admission gate.

use itertools::Itertools;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Why a puzzle file could not be turned into a value sequence.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The underlying reader failed.
    #[error("failed to read puzzle input: {0}")]
    Io(#[from] io::Error),

    /// A token was not a small non-negative integer.
    #[error("'{token}' is not a cell value")]
    BadToken {
        /// The offending token, as read.
        token: String,
    },
}

/// Parses comma-separated cell values from a `BufRead` source.
///
/// Empty tokens (trailing commas, blank lines) are skipped, so the exact
/// layout of the file does not matter. The result is handed to grid
/// construction unchecked; a wrong count or an out-of-range value is its
/// call to make.
///
/// # Errors
///
/// Returns [`CsvError`] when the reader fails or a token does not parse
/// as a cell value.
pub fn parse_values<R: BufRead>(reader: R) -> Result<Vec<u8>, CsvError> {
    let mut values = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim_start().starts_with('#') {
            continue;
        }

        let tokens = line
            .split(',')
            .flat_map(str::split_whitespace)
            .collect_vec();

        for token in tokens {
            let value = token.parse::<u8>().map_err(|_| CsvError::BadToken {
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }

    Ok(values)
}

/// Opens `path` and parses it with [`parse_values`].
///
/// # Errors
///
/// Returns [`CsvError`] when the file cannot be opened or read, or when
/// its content does not parse.
pub fn parse_file(path: &Path) -> Result<Vec<u8>, CsvError> {
    let file = std::fs::File::open(path)?;
    parse_values(io::BufReader::new(file))
}
