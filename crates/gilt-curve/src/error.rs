//! Error types for yield-curve construction.

use gilt_bonds::BondError;
use gilt_core::GiltError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur while building a yield curve.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// A bond pricing or YTM-convergence error for a specific gilt.
    #[error("{0}")]
    Bond(#[from] BondError),

    /// Underlying calendar/date/numeric error from `gilt-core`.
    #[error("{0}")]
    Core(#[from] GiltError),
}
