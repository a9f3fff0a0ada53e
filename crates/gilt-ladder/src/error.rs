//! Error types for ladder construction.

use gilt_bonds::BondError;
use gilt_core::GiltError;
use thiserror::Error;

/// A specialized Result type for ladder operations.
pub type LadderResult<T> = Result<T, LadderError>;

/// Errors that can occur while building or solving a ladder.
#[derive(Error, Debug)]
pub enum LadderError {
    /// The schedule cannot be funded within the available gilt universe.
    #[error("no ladder funds the schedule within the available gilt universe")]
    Infeasible,

    /// The underlying LP solver failed for a reason other than infeasibility
    /// (unbounded, or an internal solver error).
    #[error("LP solver error: {0}")]
    Solver(String),

    /// A post-solve invariant was violated: residual balance or residual
    /// accrued income exceeded its tolerance.
    #[error("post-solve invariant violated: {0}")]
    InvariantViolated(String),

    /// A bond pricing or cash-flow error encountered while building events.
    #[error("{0}")]
    Bond(#[from] BondError),

    /// Underlying calendar/date/numeric error from `gilt-core`.
    #[error("{0}")]
    Core(#[from] GiltError),
}
