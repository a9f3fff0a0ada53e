//! The ISIN identifier used to key gilts.
//!
//! Provides a validated security identifier (ISO 6166). Gilts are quoted
//! exclusively by ISIN in the DMO feed, so that is the only identifier
//! scheme carried here.

use serde::{Deserialize, Serialize};

use crate::error::BondError;

/// ISIN identifier with validation (ISO 6166).
///
/// A 12-character alphanumeric code: a 2-letter country code, 9
/// alphanumeric characters, and a check digit. UK gilt ISINs begin `GB`.
///
/// # Example
///
/// ```
/// use gilt_bonds::types::Isin;
///
/// let isin = Isin::new("GB00BMF9LJ31").unwrap();
/// assert_eq!(isin.country_code(), "GB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isin(String);

impl Isin {
    /// Creates a new validated ISIN.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidIsin` if the value fails ISO 6166
    /// validation.
    pub fn new(value: &str) -> Result<Self, BondError> {
        Self::validate(value)?;
        Ok(Self(value.to_uppercase()))
    }

    /// Creates an ISIN without validation (use with caution).
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into().to_uppercase())
    }

    /// Validates an ISIN string.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidIsin` describing the first violation
    /// found.
    pub fn validate(value: &str) -> Result<(), BondError> {
        if value.len() != 12 {
            return Err(BondError::invalid_isin(
                value,
                format!("expected 12 characters, got {}", value.len()),
            ));
        }

        let upper = value.to_uppercase();
        let chars: Vec<char> = upper.chars().collect();

        if !chars[0].is_ascii_uppercase() || !chars[1].is_ascii_uppercase() {
            return Err(BondError::invalid_isin(
                value,
                "country code must be two letters",
            ));
        }

        for (i, &c) in chars[2..].iter().enumerate() {
            if !c.is_ascii_alphanumeric() {
                return Err(BondError::invalid_isin(
                    value,
                    format!("invalid character {c:?} at position {}", i + 2),
                ));
            }
        }

        if !Self::verify_check_digit(&upper) {
            return Err(BondError::invalid_isin(value, "check digit mismatch"));
        }

        Ok(())
    }

    /// Verifies the ISIN check digit using the Luhn algorithm on converted
    /// digits (letters expand to two digits each: A=10, ..., Z=35).
    fn verify_check_digit(isin: &str) -> bool {
        let mut digits = Vec::new();
        for c in isin.chars() {
            if c.is_ascii_digit() {
                digits.push(c.to_digit(10).unwrap());
            } else if c.is_ascii_uppercase() {
                let v = (c as u32) - ('A' as u32) + 10;
                digits.push(v / 10);
                digits.push(v % 10);
            } else {
                return false;
            }
        }

        let len = digits.len();
        let mut sum = 0;
        for (i, &d) in digits.iter().enumerate() {
            let pos_from_right = len - 1 - i;
            let v = if pos_from_right % 2 == 1 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            };
            sum += v;
        }

        sum % 10 == 0
    }

    /// Returns the country code (first 2 characters).
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.0[0..2]
    }

    /// Returns the NSIN (chars 3-11).
    #[must_use]
    pub fn nsin(&self) -> &str {
        &self.0[2..11]
    }

    /// Returns the check digit (last character).
    #[must_use]
    pub fn check_digit(&self) -> char {
        self.0.chars().nth(11).unwrap()
    }

    /// Returns the full ISIN string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_gilt_isin() {
        let isin = Isin::new("GB00BMF9LJ31").unwrap();
        assert_eq!(isin.country_code(), "GB");
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(Isin::new("GB00BMF9LJ3").is_err());
    }

    #[test]
    fn test_bad_check_digit_rejected() {
        assert!(Isin::new("GB00BMF9LJ38").is_err());
    }

    #[test]
    fn test_lowercase_is_normalised() {
        let isin = Isin::new("gb00bmf9lj31").unwrap();
        assert_eq!(isin.as_str(), "GB00BMF9LJ31");
    }

    #[test]
    fn test_new_unchecked_bypasses_validation() {
        let isin = Isin::new_unchecked("NOTVALID1234");
        assert_eq!(isin.as_str(), "NOTVALID1234");
    }
}
