//! Parses the annual coupon rate out of a DMO instrument name.
//!
//! Instrument names such as `"Treasury Gilt 0⅝% 2035"` or the ASCII form
//! `"Treasury Gilt 0 5/8% 2035"` encode the coupon as an integer part plus
//! an optional fraction drawn from a fixed set of eighths.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::BondError;

static COUPON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(⅛|¼|⅜|½|⅝|¾|⅞|\d/\d)?\s*%").expect("static pattern is valid")
});

fn fraction_value(token: &str) -> Option<Decimal> {
    Some(match token {
        "⅛" | "1/8" => dec!(0.125),
        "¼" | "1/4" | "2/8" => dec!(0.25),
        "⅜" | "3/8" => dec!(0.375),
        "½" | "1/2" | "4/8" => dec!(0.5),
        "⅝" | "5/8" => dec!(0.625),
        "¾" | "3/4" | "6/8" => dec!(0.75),
        "⅞" | "7/8" => dec!(0.875),
        _ => return None,
    })
}

/// Extracts the annual coupon rate, in percent of par, from an instrument
/// name.
///
/// # Errors
///
/// Returns `BondError::UnparseableCoupon` if no integer-plus-fraction
/// pattern followed by `%` can be found, or the fraction token is not one
/// of the enumerated eighths.
pub fn parse_coupon(name: &str) -> Result<Decimal, BondError> {
    let captures = COUPON_PATTERN
        .captures(name)
        .ok_or_else(|| BondError::unparseable_coupon(name))?;

    let whole: Decimal = captures[1]
        .parse()
        .map_err(|_| BondError::unparseable_coupon(name))?;

    let fraction = match captures.get(2) {
        Some(m) => fraction_value(m.as_str()).ok_or_else(|| BondError::unparseable_coupon(name))?,
        None => Decimal::ZERO,
    };

    Ok(whole + fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unicode_fraction() {
        assert_eq!(parse_coupon("Treasury Gilt 0⅝% 2035").unwrap(), dec!(0.625));
    }

    #[test]
    fn parses_ascii_fraction() {
        assert_eq!(parse_coupon("Treasury Gilt 0 5/8% 2035").unwrap(), dec!(0.625));
    }

    #[test]
    fn parses_whole_number_coupon() {
        assert_eq!(parse_coupon("Treasury Gilt 4% 2060").unwrap(), dec!(4));
    }

    #[test]
    fn parses_index_linked_name() {
        assert_eq!(
            parse_coupon("Treasury Index-Linked Gilt 0⅛% 2068").unwrap(),
            dec!(0.125)
        );
    }

    #[test]
    fn rejects_name_without_percent() {
        assert!(parse_coupon("Treasury Gilt 2068").is_err());
    }
}
