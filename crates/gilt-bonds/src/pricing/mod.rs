//! Yield and present-value calculations for conventional gilts.

pub mod yield_solver;

use gilt_core::types::Date;
use gilt_core::Calendar;
use gilt_math::solvers::xnpv;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::cashflows::cash_flows;

pub use yield_solver::solve_ytm;

const DAYS_PER_YEAR: f64 = 365.25;

/// Present value of a conventional gilt's remaining cash flows at the flat
/// annual rate `rate`, discounted actual/365.25 from `settlement`.
#[must_use]
pub fn value(
    rate: Decimal,
    issue_date: Date,
    maturity: Date,
    coupon_rate: Decimal,
    settlement: Date,
    calendar: &dyn Calendar,
) -> Decimal {
    let rate_f64 = rate.to_f64().unwrap_or(0.0);
    let flows = cash_flows(issue_date, maturity, coupon_rate, settlement, calendar);

    let mut year_fractions_and_amounts: Vec<(f64, f64)> = vec![(0.0, 0.0)];
    for cf in flows.as_slice() {
        let days = cf.date() - settlement;
        let amount = cf.amount().to_f64().unwrap_or(0.0);
        year_fractions_and_amounts.push((days as f64 / DAYS_PER_YEAR, amount));
    }

    let pv = xnpv(rate_f64, &year_fractions_and_amounts);
    Decimal::from_f64_retain(pv).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_core::calendars::UKCalendar;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_at_zero_rate_equals_undiscounted_total() {
        let issue = Date::from_ymd(2020, 9, 7).unwrap();
        let maturity = Date::from_ymd(2030, 9, 7).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let calendar = UKCalendar::new();
        let flows = cash_flows(issue, maturity, dec!(4.0), settlement, &calendar);
        let total: Decimal = flows.as_slice().iter().map(|cf| cf.amount()).sum();

        let pv = value(Decimal::ZERO, issue, maturity, dec!(4.0), settlement, &calendar);
        assert_eq!(pv.round_dp(6), total.round_dp(6));
    }

    #[test]
    fn test_value_decreases_as_rate_increases() {
        let issue = Date::from_ymd(2020, 9, 7).unwrap();
        let maturity = Date::from_ymd(2030, 9, 7).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let calendar = UKCalendar::new();
        let low = value(dec!(0.02), issue, maturity, dec!(4.0), settlement, &calendar);
        let high = value(dec!(0.08), issue, maturity, dec!(4.0), settlement, &calendar);
        assert!(high < low);
    }
}
