//! Coupon schedules, accrued interest, and cash flow generation for gilts.

pub mod accrued;
pub mod schedule;

use gilt_core::types::{CashFlow, CashFlowSchedule, Date};
use gilt_core::Calendar;
use rust_decimal::Decimal;

use crate::types::ex_dividend::ex_dividend_date;
use schedule::{classify_period, coupon_dates, FirstPeriodKind};

pub use accrued::accrued_interest;

/// Generates the remaining cash flows of a conventional gilt from
/// `settlement` to redemption, per 100 nominal.
///
/// Returns an empty schedule once the trade has settled past the
/// ex-dividend date of the final coupon (nothing further is owed).
#[must_use]
pub fn cash_flows(
    issue_date: Date,
    maturity: Date,
    coupon_rate: Decimal,
    settlement_date: Date,
    calendar: &dyn Calendar,
) -> CashFlowSchedule {
    let mut schedule = CashFlowSchedule::new();
    let half_coupon = coupon_rate / Decimal::from(2);

    if settlement_date > ex_dividend_date(maturity, calendar) {
        return schedule;
    }

    let (mut prev_coupon, mut next_coupon_dates) =
        coupon_dates(issue_date, maturity, settlement_date);
    let next_coupon_date = next_coupon_dates[0];
    let xd_date = ex_dividend_date(next_coupon_date, calendar);

    if settlement_date > xd_date {
        // The upcoming coupon has already gone ex-dividend to someone
        // else; it is not received by this holder.
        prev_coupon = next_coupon_dates.remove(0);
    } else {
        let kind = classify_period(prev_coupon, issue_date);
        if kind != FirstPeriodKind::Standard {
            let first_coupon_date = next_coupon_dates.remove(0);
            let scale = match kind {
                FirstPeriodKind::Standard => unreachable!(),
                FirstPeriodKind::Short => {
                    let coupon_days = Decimal::from(first_coupon_date - issue_date);
                    let full_days = Decimal::from(first_coupon_date - prev_coupon);
                    coupon_days / full_days
                }
                FirstPeriodKind::Long => {
                    let prev_prev = prev_coupon
                        .add_months(-6)
                        .expect("gilt schedules stay within the supported calendar range");
                    let prev_days = Decimal::from(prev_coupon - issue_date);
                    let prev_full_days = Decimal::from(prev_coupon - prev_prev);
                    prev_days / prev_full_days + Decimal::from(1)
                }
            };
            schedule.push(CashFlow::coupon(first_coupon_date, scale * half_coupon));
        }
    }

    for &date in &next_coupon_dates {
        schedule.push(CashFlow::coupon(date, half_coupon));
    }

    schedule.push(CashFlow::principal(maturity, Decimal::ONE_HUNDRED));
    schedule
}
