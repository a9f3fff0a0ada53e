//! Error types for gilt instrument operations.

use gilt_core::GiltError;
use thiserror::Error;

/// A specialized Result type for gilt operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur while constructing or pricing a gilt.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Settlement date falls outside `[issue_date, maturity]`.
    #[error("Settlement date {settlement} is outside [{issue}, {maturity}]")]
    SettlementOutOfRange {
        /// Settlement date.
        settlement: String,
        /// Issue date.
        issue: String,
        /// Maturity date.
        maturity: String,
    },

    /// Yield calculation failed to converge.
    #[error("Yield calculation failed to converge after {iterations} iterations")]
    YieldConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
    },

    /// Invalid price.
    #[error("Invalid price: {reason}")]
    InvalidPrice {
        /// Description of what's invalid.
        reason: String,
    },

    /// A required RPI observation is missing for a past month.
    #[error("Missing RPI observation for {reason}")]
    MissingRpi {
        /// Description of the missing observation.
        reason: String,
    },

    /// ISIN failed ISO 6166 validation.
    #[error("Invalid ISIN {value:?}: {reason}")]
    InvalidIsin {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Coupon rate could not be parsed from an instrument name.
    #[error("Could not parse coupon from instrument name {name:?}")]
    UnparseableCoupon {
        /// The offending instrument name.
        name: String,
    },

    /// Underlying calendar/date/numeric error from `gilt-core`.
    #[error("{0}")]
    Core(#[from] GiltError),
}

impl BondError {
    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Creates a settlement-out-of-range error.
    #[must_use]
    pub fn settlement_out_of_range(
        settlement: impl std::fmt::Display,
        issue: impl std::fmt::Display,
        maturity: impl std::fmt::Display,
    ) -> Self {
        Self::SettlementOutOfRange {
            settlement: settlement.to_string(),
            issue: issue.to_string(),
            maturity: maturity.to_string(),
        }
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            reason: reason.into(),
        }
    }

    /// Creates a missing-RPI error.
    #[must_use]
    pub fn missing_rpi(reason: impl Into<String>) -> Self {
        Self::MissingRpi {
            reason: reason.into(),
        }
    }

    /// Creates an invalid-ISIN error.
    #[must_use]
    pub fn invalid_isin(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIsin {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unparseable-coupon error.
    #[must_use]
    pub fn unparseable_coupon(name: impl Into<String>) -> Self {
        Self::UnparseableCoupon { name: name.into() }
    }
}
