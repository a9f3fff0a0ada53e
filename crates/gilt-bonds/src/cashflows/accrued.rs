//! Accrued interest on a conventional gilt.
//!
//! Gilts accrue on an actual/actual basis over the current coupon period.
//! The formula differs depending on where `settlement` sits relative to
//! the bond's first coupon period ([`FirstPeriodKind`]), and is rebated
//! to a negative value once the trade settles ex-dividend.

use gilt_core::types::Date;
use gilt_core::Calendar;
use rust_decimal::Decimal;

use super::schedule::FirstPeriodKind;
use crate::types::ex_dividend::ex_dividend_date;

/// Returns accrued interest per 100 nominal for a coupon period.
///
/// `prev_coupon`/`next_coupon` bracket `settlement`; `coupon_rate` is the
/// annual coupon in percent of par (e.g. `4` for a 4% gilt). `kind` comes
/// from [`super::schedule::classify_period`] applied to `prev_coupon`.
#[must_use]
pub fn accrued_interest(
    settlement: Date,
    issue_date: Date,
    prev_coupon: Date,
    next_coupon: Date,
    coupon_rate: Decimal,
    kind: FirstPeriodKind,
    calendar: &dyn Calendar,
) -> Decimal {
    let dividend = coupon_rate / Decimal::from(2);
    let full_coupon_days = Decimal::from(next_coupon - prev_coupon);
    let xd_date = ex_dividend_date(next_coupon, calendar);

    let fraction = match kind {
        FirstPeriodKind::Standard => {
            let interest_days = Decimal::from(settlement - prev_coupon);
            let mut fraction = interest_days / full_coupon_days;
            if settlement > xd_date {
                fraction -= Decimal::from(1);
            }
            fraction
        }
        FirstPeriodKind::Short => {
            let interest_days = Decimal::from(settlement - issue_date);
            let coupon_days = Decimal::from(next_coupon - issue_date);
            if settlement <= xd_date {
                interest_days / full_coupon_days
            } else {
                (interest_days - coupon_days) / full_coupon_days
            }
        }
        FirstPeriodKind::Long => {
            let prev_prev_coupon = prev_coupon
                .add_months(-6)
                .expect("gilt schedules stay within the supported calendar range");
            let prev_full_coupon_days = Decimal::from(prev_coupon - prev_prev_coupon);
            if settlement < prev_coupon {
                let interest_days = Decimal::from(settlement - issue_date);
                interest_days / prev_full_coupon_days
            } else if settlement <= xd_date {
                let first_leg = Decimal::from(prev_coupon - issue_date) / prev_full_coupon_days;
                let second_leg = Decimal::from(settlement - prev_coupon) / full_coupon_days;
                first_leg + second_leg
            } else {
                Decimal::from(settlement - prev_coupon) / full_coupon_days - Decimal::from(1)
            }
        }
    };

    fraction * dividend
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
    fn test_standard_period_mid_coupon() {
        // TN25-like bond: issue 2023-06-05, maturity 2025-01-31, 0.25%
        // coupon. Settled 2024-03-01, bracketed by the 2024-01-31 /
        // 2024-07-31 standard coupon period.
        let issue = Date::from_ymd(2023, 6, 5).unwrap();
        let prev = Date::from_ymd(2024, 1, 31).unwrap();
        let next = Date::from_ymd(2024, 7, 31).unwrap();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let ai = accrued_interest(
            settlement,
            issue,
            prev,
            next,
            dec!(0.25),
            FirstPeriodKind::Standard,
            &ukc(),
        );
        assert_eq!(ai.round_dp(6), dec!(0.020604));
    }

    #[test]
    fn test_standard_period_is_negative_after_ex_dividend() {
        let issue = Date::from_ymd(2023, 6, 5).unwrap();
        let prev = Date::from_ymd(2024, 1, 31).unwrap();
        let next = Date::from_ymd(2024, 7, 31).unwrap();
        let settlement = Date::from_ymd(2024, 7, 25).unwrap();
        let ai = accrued_interest(
            settlement,
            issue,
            prev,
            next,
            dec!(0.25),
            FirstPeriodKind::Standard,
            &ukc(),
        );
        assert!(ai < Decimal::ZERO);
        assert_eq!(ai.round_dp(6), dec!(-0.004121));
    }

    #[test]
    fn test_accrued_is_zero_on_coupon_date() {
        let issue = Date::from_ymd(2023, 6, 5).unwrap();
        let prev = Date::from_ymd(2024, 1, 31).unwrap();
        let next = Date::from_ymd(2024, 7, 31).unwrap();
        let ai = accrued_interest(
            prev,
            issue,
            prev,
            next,
            dec!(0.25),
            FirstPeriodKind::Standard,
            &ukc(),
        );
        assert_eq!(ai, Decimal::ZERO);
    }
}
