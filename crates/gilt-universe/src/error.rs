//! Error types for feed parsing and universe construction.

use gilt_bonds::BondError;
use gilt_core::GiltError;
use thiserror::Error;

/// A specialized Result type for universe operations.
pub type UniverseResult<T> = Result<T, UniverseError>;

/// Errors that can occur while parsing an instrument or price feed.
///
/// Per the feed's error taxonomy, data-validation errors are construction-time
/// and fatal to the affected record: a malformed row is rejected rather than
/// silently dropped or coerced.
#[derive(Error, Debug, Clone)]
pub enum UniverseError {
    /// The `INSTRUMENT_TYPE` column (or its CSV-derived substitute) did not
    /// match one of the known instrument types.
    #[error("unknown instrument type {value:?} for ISIN {isin}")]
    UnknownInstrumentType {
        /// The offending value.
        value: String,
        /// The record's ISIN, for diagnostics.
        isin: String,
    },

    /// A required field was absent from a record.
    #[error("missing required field {field:?} for ISIN {isin}")]
    MissingField {
        /// The absent field's name.
        field: String,
        /// The record's ISIN, for diagnostics.
        isin: String,
    },

    /// A date column could not be parsed.
    #[error("could not parse date {value:?} in field {field:?}")]
    InvalidDate {
        /// The field name.
        field: String,
        /// The unparseable value.
        value: String,
    },

    /// A bond could not be constructed from an otherwise well-formed record.
    #[error("could not construct gilt: {0}")]
    Bond(#[from] BondError),

    /// Underlying calendar/date/numeric error from `gilt-core`.
    #[error("{0}")]
    Core(#[from] GiltError),

    /// Malformed CSV feed.
    #[error("CSV parse error: {0}")]
    Csv(String),
}

impl From<csv::Error> for UniverseError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
