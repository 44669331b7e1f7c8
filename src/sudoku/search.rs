#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The concurrent backtracking orchestrator.
//!
//! Every branch owns a private [`Grid`] snapshot and loops
//! propagate-then-branch. When propagation stalls, the branch keeps the
//! first candidate of the most constrained cell for itself and forks one
//! new thread per remaining candidate, each seeded with its own snapshot.
//! All branches share two pieces of state: a set-once win flag and a
//! one-slot result channel. The first branch to complete its grid flips
//! the flag and sends the report; everyone else notices the flag at the
//! next check point and stands down without reporting. A branch that runs
//! into a contradiction just stops; if every branch stops that way, the
//! senders all drop and the caller sees an explicit empty outcome rather
//! than a hang.
//!
//! Forking is capped: past [`MAX_LIVE_FORKS`] concurrently live forked
//! branches, the remaining candidates are explored sequentially on the
//! current thread, so pathological inputs cannot stack up threads without
//! bound.

use crate::sudoku::candidate::Digit;
use crate::sudoku::grid::Grid;
use crate::sudoku::propagation::{Propagation, propagate};
use crate::sudoku::report::SolutionReport;
use crossbeam::channel::{Receiver, Sender, bounded};
use log::{debug, trace};
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

/// Most forked branches allowed to be live at once.
pub const MAX_LIVE_FORKS: usize = 64;

/// State shared by every branch of one solving session.
#[derive(Debug, Default)]
struct SearchShared {
    /// Set-once win flag. Branches check it before doing further work.
    solved: AtomicBool,
    /// Total branches forked onto their own threads, ever.
    forked: AtomicUsize,
    /// Forked branches currently live, bounded by [`MAX_LIVE_FORKS`].
    live: AtomicUsize,
}

impl SearchShared {
    /// Claims the win. Only the first caller ever succeeds.
    fn claim_win(&self) -> bool {
        self.solved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_won(&self) -> bool {
        self.solved.load(Ordering::Acquire)
    }

    /// Reserves a slot for one more live forked branch.
    fn reserve_fork(&self) -> bool {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < MAX_LIVE_FORKS).then_some(live + 1)
            })
            .is_ok()
    }

    fn release_fork(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// The caller's side of a running solve.
///
/// Exactly one [`SolutionReport`] is ever delivered per solve; an
/// exhausted search delivers nothing and the handle reports that as
/// `None` instead of blocking forever.
#[derive(Debug)]
pub struct SolveHandle {
    report: Receiver<SolutionReport>,
}

impl SolveHandle {
    /// Blocks until the search ends.
    ///
    /// `Some` carries the single published report; `None` means every
    /// branch died on a contradiction, which can only happen when an
    /// admission-valid puzzle has no solution.
    #[must_use]
    pub fn wait(&self) -> Option<SolutionReport> {
        self.report.recv().ok()
    }

    /// Non-blocking poll, for callers that keep an "unknown" display
    /// until a report lands.
    #[must_use]
    pub fn try_wait(&self) -> Option<SolutionReport> {
        self.report.try_recv().ok()
    }
}

/// Starts solving `grid` and returns immediately.
///
/// The initial branch runs on its own worker thread, so the invoking
/// context never blocks while the search runs; it collects the outcome
/// through the returned [`SolveHandle`] whenever it chooses.
#[must_use]
pub fn solve(grid: Grid) -> SolveHandle {
    let (tx, rx) = bounded(1);
    let shared = Arc::new(SearchShared::default());

    thread::spawn(move || explore(grid, 0, &shared, &tx));

    SolveHandle { report: rx }
}

/// Runs one branch to its end: solved, contradicted, or abandoned.
///
/// `depth` counts the branching decisions taken on the way to this grid.
fn explore(
    mut grid: Grid,
    mut depth: usize,
    shared: &Arc<SearchShared>,
    report: &Sender<SolutionReport>,
) {
    loop {
        if shared.is_won() {
            trace!("branch at depth {depth} abandoned, another branch already won");
            return;
        }

        match propagate(&mut grid) {
            Propagation::Contradiction => {
                trace!("branch at depth {depth} hit a contradiction");
                return;
            }
            Propagation::Solved => {
                if shared.claim_win() {
                    let threads_used = shared.forked.load(Ordering::Acquire);
                    debug!("solution found, {threads_used} branches were forked");
                    // The receiver may already be gone; nothing to do then.
                    let _ = report.send(SolutionReport { grid, threads_used });
                }
                return;
            }
            Propagation::Stalled(cell) => {
                let mut digits: SmallVec<[Digit; 9]> = grid.candidates(cell).iter().collect();
                // The race makes the winner nondeterministic anyway, and a
                // varied exploration order diversifies the sibling branches.
                fastrand::shuffle(&mut digits);

                let Some((&keep, forks)) = digits.split_first() else {
                    return;
                };

                // Fork a sibling per extra candidate, then carry on with
                // the first candidate on this thread.
                depth += 1;
                for &digit in forks {
                    if shared.is_won() {
                        return;
                    }
                    let child = grid.place(cell, digit);
                    if shared.reserve_fork() {
                        shared.forked.fetch_add(1, Ordering::AcqRel);
                        trace!("forking digit {digit} at cell {cell}, depth {depth}");
                        let shared = Arc::clone(shared);
                        let report = report.clone();
                        thread::spawn(move || {
                            explore(child, depth, &shared, &report);
                            shared.release_fork();
                        });
                    } else {
                        // Fork cap reached: explore this candidate on the
                        // current thread instead of spawning.
                        explore(child, depth, shared, report);
                    }
                }

                grid.set(cell, keep);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::grid::{EXAMPLE_PUZZLE, EXAMPLE_SOLUTION, SIDE};
    use std::time::Duration;

    fn example() -> Grid {
        Grid::try_from(EXAMPLE_PUZZLE).expect("example puzzle is valid")
    }

    fn solution() -> Grid {
        Grid::try_from(EXAMPLE_SOLUTION).expect("solution grid is valid")
    }

    /// Seventeen clues of the example solution, spread so thin that the
    /// very first propagation fixpoint stalls and the search must fork.
    fn sparse_puzzle() -> Grid {
        let mut values = [0u8; 81];
        for (row, col, value) in [
            (0, 0, 5),
            (0, 5, 8),
            (1, 2, 2),
            (1, 7, 4),
            (2, 4, 4),
            (2, 8, 7),
            (3, 1, 5),
            (3, 6, 4),
            (4, 3, 8),
            (4, 8, 1),
            (5, 0, 7),
            (5, 5, 4),
            (6, 2, 1),
            (6, 7, 8),
            (7, 1, 8),
            (7, 4, 1),
            (8, 6, 1),
        ] {
            values[row * SIDE + col] = value;
        }
        Grid::new(&values).expect("17 consistent clues")
    }

    /// Admission-valid by units and clue count, yet cell 0 has no
    /// candidate at all: row 0 pins eight digits and the box pins the
    /// ninth.
    fn unsolvable_puzzle() -> Grid {
        let mut values = [0u8; 81];
        values[1..9].copy_from_slice(&[3, 4, 6, 7, 8, 9, 1, 2]);
        values[18] = 5;
        for (cell, value) in [
            (39, 8),
            (42, 7),
            (49, 2),
            (52, 5),
            (59, 7),
            (62, 4),
            (66, 4),
            (76, 8),
        ] {
            values[cell] = value;
        }
        Grid::new(&values).expect("17 consistent clues")
    }

    #[test]
    fn test_solves_canonical_puzzle() {
        let report = solve(example()).wait().expect("puzzle has a solution");
        assert_eq!(report.grid, solution());
        assert!(report.grid.verify());
        assert!(report.grid.extends(&example()));
    }

    #[test]
    fn test_repeated_solves_agree() {
        // The race decides which branch reports, never what it reports.
        let first = solve(example()).wait().expect("solvable").values();
        for _ in 0..7 {
            let again = solve(example()).wait().expect("solvable").values();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_already_solved_grid_is_returned_unchanged() {
        let report = solve(solution()).wait().expect("already solved");
        assert_eq!(report.grid, solution());
        assert_eq!(report.threads_used, 0);
    }

    #[test]
    fn test_branching_puzzle_reports_forked_threads() {
        let puzzle = sparse_puzzle();
        let report = solve(puzzle.clone()).wait().expect("solvable");
        assert!(report.grid.verify());
        assert!(report.grid.extends(&puzzle));
        assert!(
            report.threads_used >= 1,
            "a stalling puzzle must have forked at least once"
        );
    }

    #[test]
    fn test_unsolvable_puzzle_reports_nothing() {
        let handle = solve(unsolvable_puzzle());
        assert_eq!(handle.wait(), None);
        // The channel stays empty afterwards as well.
        assert_eq!(handle.try_wait(), None);
    }

    #[test]
    fn test_try_wait_eventually_sees_the_report() {
        let handle = solve(example());
        for _ in 0..10_000 {
            if let Some(report) = handle.try_wait() {
                assert!(report.grid.verify());
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("no report within ten seconds");
    }

    #[test]
    fn test_win_flag_is_set_once() {
        let shared = SearchShared::default();
        assert!(shared.claim_win());
        assert!(!shared.claim_win());
        assert!(shared.is_won());
    }

    #[test]
    fn test_fork_reservation_respects_the_cap() {
        let shared = SearchShared::default();
        for _ in 0..MAX_LIVE_FORKS {
            assert!(shared.reserve_fork());
        }
        assert!(!shared.reserve_fork());
        shared.release_fork();
        assert!(shared.reserve_fork());
    }
}
