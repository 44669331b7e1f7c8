//! # sudoku-solver
//!
//! Command-line front end for the concurrent Sudoku solver.
//!
//! Puzzles are flat lists of 81 comma-separated values in reading order,
//! `0` for an empty cell. Input is validated before any search starts:
//! wrong shape, out-of-range values, duplicated digits in a unit or fewer
//! than 17 clues are rejected immediately with the reason.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a single puzzle file
//! sudoku-solver puzzle.csv
//! sudoku-solver file --path puzzle.csv
//!
//! # Solve a puzzle given inline
//! sudoku-solver text --input "5,3,0,0,7,0,...,0"
//!
//! # Solve every puzzle file under a directory
//! sudoku-solver dir --path puzzles/
//!
//! # Generate shell completions
//! sudoku-solver completions bash
//! ```
//!
//! Each solve prints the solution grid, and with `--stats` (the default)
//! a summary table: parse and solve times, clue count, how many extra
//! threads the search forked, and memory usage.

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sudoku_solver::sudoku::csv::{self, CsvError};
use sudoku_solver::sudoku::grid::Grid;
use sudoku_solver::sudoku::report::SolutionReport;
use sudoku_solver::sudoku::search::solve;
use tikv_jemalloc_ctl::{epoch, stats};
use walkdir::WalkDir;

/// Global allocator using `tikv-jemallocator`, which also backs the
/// memory figures in the statistics table.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "sudoku-solver", version, about = "A concurrent Sudoku solver")]
struct Cli {
    /// An optional bare path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `dir`).
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a puzzle file of 81 comma-separated values.
    File {
        /// Path to the puzzle file.
        #[arg(short, long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as plain text.
    Text {
        /// The 81 cell values as a string, comma- or space-separated.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every puzzle file found under a directory.
    Dir {
        /// Directory to scan for `.csv`, `.txt` and `.sudoku` files.
        #[arg(short, long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across subcommands.
#[derive(Args, Debug, Default, Clone)]
struct CommonOptions {
    /// Enable debug output, echoing the parsed puzzle before solving.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Enable verification of the found solution: every unit must be
    /// exactly {1..9} and every clue must be unchanged.
    #[arg(short, long, default_value_t = true)]
    verify: bool,

    /// Enable printing of performance statistics after solving.
    #[arg(short, long, default_value_t = true)]
    stats: bool,
}

/// Main entry point: parses arguments and dispatches.
fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // A bare path without a subcommand defaults to solving that file.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            run_file(&path, &cli.common);
            return;
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => run_file(&path, &common),
        Some(Commands::Text { input, common }) => {
            let time = Instant::now();
            match parse_textual_values(&input) {
                Ok(values) => run_values(&values, None, &common, time.elapsed()),
                Err(e) => {
                    eprintln!("Error parsing puzzle text: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Dir { path, common }) => run_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sudoku-solver", &mut std::io::stdout());
        }
        None => {
            if cli.path.is_none() {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        }
    }
}

/// Parses and solves a single puzzle file.
fn run_file(path: &Path, common: &CommonOptions) {
    let time = Instant::now();
    match csv::parse_file(path) {
        Ok(values) => run_values(&values, path.to_str(), common, time.elapsed()),
        Err(e) => {
            eprintln!("Error parsing puzzle file: {e}");
            std::process::exit(1);
        }
    }
}

/// Validates a value sequence and, if admitted, solves and reports.
fn run_values(values: &[u8], label: Option<&str>, common: &CommonOptions, parse_time: Duration) {
    match Grid::new(values) {
        Ok(grid) => solve_and_report(&grid, common, label, parse_time),
        Err(e) => {
            // Fail fast: no search ever starts for a rejected input.
            eprintln!("Invalid sudoku: {e}");
            std::process::exit(1);
        }
    }
}

/// Solves every puzzle file under `dir`, one line per file.
fn run_dir(dir: &Path, common: &CommonOptions) {
    let mut total = 0usize;
    let mut solved = 0usize;

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_puzzle = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "csv" | "txt" | "sudoku"));
        if !is_puzzle {
            continue;
        }

        total += 1;
        let outcome = csv::parse_file(path)
            .map_err(|e| e.to_string())
            .and_then(|values| Grid::new(&values).map_err(|e| e.to_string()));
        match outcome {
            Ok(grid) => {
                let time = Instant::now();
                match solve(grid).wait() {
                    Some(report) => {
                        solved += 1;
                        println!(
                            "{}: solved in {:.3}s, {} threads forked",
                            path.display(),
                            time.elapsed().as_secs_f64(),
                            report.threads_used
                        );
                        if common.debug {
                            println!("{}", report.grid);
                        }
                    }
                    None => println!("{}: no solution", path.display()),
                }
            }
            Err(e) => println!("{}: rejected ({e})", path.display()),
        }
    }

    println!("{solved}/{total} puzzles solved");
}

/// Solves an admitted grid and prints the outcome, statistics included.
fn solve_and_report(grid: &Grid, common: &CommonOptions, label: Option<&str>, parse_time: Duration) {
    if let Some(name) = label {
        println!("Solving: {name}");
    }

    if common.debug {
        println!("Puzzle ({} clues):\n{grid}", grid.filled_cells());
    }

    epoch::advance().unwrap();

    let time = Instant::now();
    let report = solve(grid.clone()).wait();
    let elapsed = time.elapsed();

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if common.verify {
        verify_report(grid, report.as_ref());
    }

    if common.stats {
        print_stats(
            parse_time,
            elapsed,
            grid,
            report.as_ref(),
            allocated_mib,
            resident_mib,
        );
    }

    match report {
        Some(report) => println!("Solution:\n{}", report.grid),
        None => println!("No solution found"),
    }
}

/// Checks a delivered report against the puzzle it was produced for.
///
/// Prints whether the verification was successful. If verification fails,
/// it panics. An absent report (exhausted search) just prints that.
fn verify_report(puzzle: &Grid, report: Option<&SolutionReport>) {
    if let Some(report) = report {
        let ok = report.grid.verify() && report.grid.extends(puzzle);
        println!("Verified: {ok:?}");
        if !ok {
            panic!("Solution failed verification!");
        }
    } else {
        println!("UNSOLVED");
    }
}

/// Parses a textual flat value list, e.g. `"5,3,0,...,9"`.
fn parse_textual_values(input: &str) -> Result<Vec<u8>, CsvError> {
    csv::parse_values(Cursor::new(input))
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of puzzle and search statistics.
fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    puzzle: &Grid,
    report: Option<&SolutionReport>,
    allocated: f64,
    resident: f64,
) {
    println!("\n=====================[ Puzzle Statistics ]=====================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Clues", puzzle.filled_cells());
    stat_line("Empty cells", 81 - puzzle.filled_cells());

    println!("=====================[ Search Statistics ]====================");
    match report {
        Some(report) => stat_line("Threads used", report.threads_used),
        None => stat_line("Threads used", "-"),
    }
    stat_line("Solve time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    println!("==============================================================");

    if report.is_some() {
        println!("\nSOLVED");
    } else {
        println!("\nNO SOLUTION");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_textual_values_simple() {
        let input = "5,3,0,0,7";
        assert_eq!(parse_textual_values(input).unwrap(), vec![5, 3, 0, 0, 7]);
    }

    #[test]
    fn test_parse_textual_values_mixed_separators() {
        let input = "5 3,0\n0,7";
        assert_eq!(parse_textual_values(input).unwrap(), vec![5, 3, 0, 0, 7]);
    }

    #[test]
    fn test_parse_textual_values_bad_token() {
        assert!(parse_textual_values("5,three,0").is_err());
    }

    #[test]
    fn test_parse_textual_values_empty_input() {
        assert_eq!(parse_textual_values("").unwrap(), Vec::<u8>::new());
    }
}
