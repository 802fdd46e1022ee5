//! Constraint solving.
//!
//! Solving is a pluggable strategy behind the [`Strategy`] trait. Each
//! puzzle family ships two implementations: a corpus scan that filters a
//! precomputed enumeration of structurally valid boards, and an
//! exhaustive backtracking search. The capture pipeline only sees the
//! trait, so strategies can be swapped without touching it.

mod corpus;
mod duet;
mod queens;

pub use corpus::{CorpusError, CorpusStore};
pub use duet::{
    enumerate_duet_grids, matches_instance, DuetBacktracking, DuetCorpusScan, DuetInstance,
};
pub use queens::{
    enumerate_queens, is_valid_placement, respects_regions, QueensBacktracking,
    QueensCorpusScan, QueensSolution,
};

use thiserror::Error;

/// Solver failures.
#[derive(Debug, Error)]
pub enum SolveError {
    /// No candidate assignment satisfies the instance.
    #[error("no candidate solution matches the instance")]
    Unsolvable,
    /// No precomputed corpus exists for this board size.
    #[error("no solution corpus for side {side}")]
    CorpusMissing {
        /// The unsupported board side.
        side: usize,
    },
    /// The corpus file exists but could not be used.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

/// A pluggable solving strategy.
pub trait Strategy {
    /// Puzzle instance consumed by this strategy.
    type Instance;
    /// Full assignment produced on success.
    type Solution;

    /// Returns one valid assignment for the instance.
    fn solve(&mut self, instance: &Self::Instance) -> Result<Self::Solution, SolveError>;
}
