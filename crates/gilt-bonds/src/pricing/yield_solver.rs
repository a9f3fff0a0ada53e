//! Yield-to-maturity solver for conventional gilts.
//!
//! The DMO price/yield formula (see
//! <https://www.dmo.gov.uk/media/1sljygul/yldeqns.pdf>, Section 1) solves for
//! the discount factor per coupon period `v = 1/(1+y/f)` rather than the
//! yield `y` directly, folding the bond's remaining semi-annual coupons and
//! final redemption into a single closed-form polynomial in `v`. The only
//! awkward part is that the first coupon period is rarely exactly
//! semi-annual, so its discounting exponent and cash amount need the
//! SHORT/LONG adjustments from [`crate::cashflows::schedule`].

use gilt_core::types::Date;
use gilt_core::Calendar;
use gilt_math::solvers::{newton_raphson_numerical, SolverConfig};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::cashflows::schedule::{classify_period, coupon_dates, FirstPeriodKind};
use crate::error::{BondError, BondResult};
use crate::types::ex_dividend::ex_dividend_date;

const ANNUAL_FREQUENCY: f64 = 2.0;
const INITIAL_GUESS_RATE: f64 = 0.05;

/// Solves for the annual yield to maturity implied by `dirty_price`.
///
/// # Errors
///
/// Returns `BondError::InvalidPrice` if `dirty_price` is not positive, or
/// `BondError::YieldConvergenceFailed` if the Newton iteration does not
/// converge.
#[allow(clippy::too_many_arguments)]
pub fn solve_ytm(
    dirty_price: Decimal,
    issue_date: Date,
    maturity: Date,
    coupon_rate: Decimal,
    settlement: Date,
    calendar: &dyn Calendar,
) -> BondResult<Decimal> {
    let price = dirty_price
        .to_f64()
        .filter(|p| *p > 0.0)
        .ok_or_else(|| BondError::invalid_price("dirty price must be positive"))?;

    let (mut prev_coupon, next_coupon_dates) = coupon_dates(issue_date, maturity, settlement);
    let mut next_coupon = next_coupon_dates[0];
    let mut n = (next_coupon_dates.len() - 1) as i32;

    let c = coupon_rate.to_f64().unwrap_or(0.0);
    let f = ANNUAL_FREQUENCY;
    let mut d1 = c / f;
    let mut d2 = c / f;

    let xd_date = ex_dividend_date(next_coupon, calendar);
    if settlement > xd_date {
        d1 = 0.0;
    } else {
        match classify_period(prev_coupon, issue_date) {
            FirstPeriodKind::Standard => {}
            FirstPeriodKind::Short => {
                let coupon_days = (next_coupon - issue_date) as f64;
                let full_days = (next_coupon - prev_coupon) as f64;
                d1 *= coupon_days / full_days;
            }
            FirstPeriodKind::Long => {
                let prev_prev_coupon = prev_coupon.add_months(-6)?;
                let prev_days = (prev_coupon - issue_date) as f64;
                let prev_full_days = (prev_coupon - prev_prev_coupon) as f64;
                d1 *= 1.0 + prev_days / prev_full_days;

                if settlement <= prev_coupon {
                    next_coupon = prev_coupon;
                    prev_coupon = prev_prev_coupon;
                    n += 1;
                    d2 = d1;
                    d1 = 0.0;
                }
            }
        }
    }

    let r = (next_coupon - settlement) as f64;
    let s = (next_coupon - prev_coupon) as f64;

    let y = if n > 0 {
        let v0 = 1.0 / (1.0 + INITIAL_GUESS_RATE / f);
        let fn_v = |v: f64| {
            v.powf(r / s)
                * (d1 + d2 * v + c * v * v / (f * (1.0 - v)) * (1.0 - v.powi(n - 1))
                    + 100.0 * v.powi(n))
                - price
        };
        let result = newton_raphson_numerical(fn_v, v0, &SolverConfig::default())
            .map_err(|_| BondError::YieldConvergenceFailed {
                iterations: SolverConfig::default().max_iterations,
            })?;
        (1.0 / result.root - 1.0) * f
    } else {
        f * ((d1 + 100.0) / price).powf(s / r) - 1.0
    };

    Decimal::from_f64_retain(y)
        .ok_or_else(|| BondError::invalid_price("yield solver produced a non-finite result"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_core::calendars::UKCalendar;
    use rust_decimal_macros::dec;

    fn ukc() -> UKCalendar {
        UKCalendar::new()
    }

    #[test]
    fn test_ytm_is_positive_for_a_discount_price() {
        let issue = Date::from_ymd(2020, 9, 7).unwrap();
        let maturity = Date::from_ymd(2030, 9, 7).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let y = solve_ytm(dec!(92.00), issue, maturity, dec!(0.875), settlement, &ukc()).unwrap();
        assert!(y > Decimal::ZERO);
    }

    #[test]
    fn test_ytm_roughly_matches_current_yield_at_par() {
        let issue = Date::from_ymd(2020, 9, 7).unwrap();
        let maturity = Date::from_ymd(2030, 9, 7).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let y = solve_ytm(dec!(100.00), issue, maturity, dec!(4.0), settlement, &ukc()).unwrap();
        assert!(y > dec!(0.03) && y < dec!(0.05));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let issue = Date::from_ymd(2020, 9, 7).unwrap();
        let maturity = Date::from_ymd(2030, 9, 7).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        assert!(solve_ytm(dec!(0), issue, maturity, dec!(4.0), settlement, &ukc()).is_err());
    }
}
