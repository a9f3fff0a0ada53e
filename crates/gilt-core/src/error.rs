//! Error types shared across the gilt analytics crates.

use rust_decimal::Decimal;
use thiserror::Error;

/// A specialized Result type for gilt-core operations.
pub type GiltResult<T> = Result<T, GiltError>;

/// The main error type shared by the gilt crates.
#[derive(Error, Debug, Clone)]
pub enum GiltError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Numerical solver failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid yield value.
    #[error("Invalid yield: {value} - {reason}")]
    InvalidYield {
        /// The invalid yield value.
        value: Decimal,
        /// Reason for invalidity.
        reason: String,
    },

    /// Invalid price value.
    #[error("Invalid price: {value} - {reason}")]
    InvalidPrice {
        /// The invalid price value.
        value: Decimal,
        /// Reason for invalidity.
        reason: String,
    },

    /// Invalid cash flow schedule.
    #[error("Invalid cash flow: {reason}")]
    InvalidCashFlow {
        /// Description of the invalid cash flow.
        reason: String,
    },

    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidBondSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Mathematical error (division by zero, overflow, etc.).
    #[error("Mathematical error: {reason}")]
    MathError {
        /// Description of the error.
        reason: String,
    },

    /// RPI series lookup or extrapolation error.
    #[error("RPI series error: {reason}")]
    RpiError {
        /// Description of the error.
        reason: String,
    },

    /// Failed to parse an upstream data feed (DMO instrument list, price feed).
    #[error("Parse error in {source_name}: {reason}")]
    ParseError {
        /// Name of the feed or file being parsed.
        source_name: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    ConfigError {
        /// Description of the configuration error.
        reason: String,
    },
}

impl GiltError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a convergence failure error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates a math error.
    #[must_use]
    pub fn math_error(reason: impl Into<String>) -> Self {
        Self::MathError {
            reason: reason.into(),
        }
    }

    /// Creates an RPI series error.
    #[must_use]
    pub fn rpi_error(reason: impl Into<String>) -> Self {
        Self::RpiError {
            reason: reason.into(),
        }
    }

    /// Creates a feed parse error.
    #[must_use]
    pub fn parse_error(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GiltError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_convergence_error() {
        let err = GiltError::convergence_failed(100, 1e-6);
        assert!(err.to_string().contains("100 iterations"));
    }
}
