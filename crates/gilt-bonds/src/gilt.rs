//! A conventional (fixed-coupon) gilt.

use gilt_core::types::{CashFlowSchedule, Date};
use gilt_core::Calendar;
use rust_decimal::Decimal;

use crate::cashflows::{accrued_interest, cash_flows, schedule::classify_period};
use crate::error::{BondError, BondResult};
use crate::pricing::{solve_ytm, value};
use crate::traits::Gilt;
use crate::types::Isin;

/// A conventional UK gilt: a fixed semi-annual coupon redeemed at par.
#[derive(Debug, Clone)]
pub struct ConventionalGilt {
    isin: Isin,
    issue_date: Date,
    maturity: Date,
    coupon_rate: Decimal,
}

impl ConventionalGilt {
    /// Creates a new conventional gilt.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidSpec` if `issue_date >= maturity` or
    /// `coupon_rate` is negative.
    pub fn new(
        isin: Isin,
        issue_date: Date,
        maturity: Date,
        coupon_rate: Decimal,
    ) -> BondResult<Self> {
        if issue_date >= maturity {
            return Err(BondError::invalid_spec(format!(
                "issue date {issue_date} must precede maturity {maturity}"
            )));
        }
        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_spec("coupon rate cannot be negative"));
        }
        Ok(Self {
            isin,
            issue_date,
            maturity,
            coupon_rate,
        })
    }

    fn check_settlement(&self, settlement: Date) -> BondResult<()> {
        if settlement < self.issue_date || settlement > self.maturity {
            return Err(BondError::settlement_out_of_range(
                settlement,
                self.issue_date,
                self.maturity,
            ));
        }
        Ok(())
    }
}

impl Gilt for ConventionalGilt {
    fn isin(&self) -> &Isin {
        &self.isin
    }

    fn issue_date(&self) -> Date {
        self.issue_date
    }

    fn maturity(&self) -> Date {
        self.maturity
    }

    fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    fn coupon_dates(&self, settlement: Date, calendar: &dyn Calendar) -> (Date, Vec<Date>) {
        let _ = calendar;
        crate::cashflows::schedule::coupon_dates(self.issue_date, self.maturity, settlement)
    }

    fn accrued_interest(&self, settlement: Date, calendar: &dyn Calendar) -> BondResult<Decimal> {
        self.check_settlement(settlement)?;
        let (prev_coupon, next_coupon_dates) =
            crate::cashflows::schedule::coupon_dates(self.issue_date, self.maturity, settlement);
        let next_coupon = next_coupon_dates[0];
        let kind = classify_period(prev_coupon, self.issue_date);
        Ok(accrued_interest(
            settlement,
            self.issue_date,
            prev_coupon,
            next_coupon,
            self.coupon_rate,
            kind,
            calendar,
        ))
    }

    fn cash_flows(&self, settlement: Date, calendar: &dyn Calendar) -> CashFlowSchedule {
        cash_flows(
            self.issue_date,
            self.maturity,
            self.coupon_rate,
            settlement,
            calendar,
        )
    }

    fn ytm(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        self.check_settlement(settlement)?;
        solve_ytm(
            dirty_price,
            self.issue_date,
            self.maturity,
            self.coupon_rate,
            settlement,
            calendar,
        )
    }

    fn value(&self, rate: Decimal, settlement: Date, calendar: &dyn Calendar) -> Decimal {
        value(
            rate,
            self.issue_date,
            self.maturity,
            self.coupon_rate,
            settlement,
            calendar,
        )
    }

    fn short_name(&self) -> String {
        format!("{:.3}% {}", self.coupon_rate, self.maturity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_core::calendars::UKCalendar;
    use rust_decimal_macros::dec;

    fn ukc() -> UKCalendar {
        UKCalendar::new()
    }

    fn sample() -> ConventionalGilt {
        ConventionalGilt::new(
            Isin::new("GB00BMF9LJ31").unwrap(),
            Date::from_ymd(2023, 6, 5).unwrap(),
            Date::from_ymd(2025, 1, 31).unwrap(),
            dec!(0.25),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_issue_after_maturity() {
        let result = ConventionalGilt::new(
            Isin::new("GB00BMF9LJ31").unwrap(),
            Date::from_ymd(2025, 1, 31).unwrap(),
            Date::from_ymd(2023, 6, 5).unwrap(),
            dec!(0.25),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_settlement_out_of_range_is_rejected() {
        let gilt = sample();
        let too_early = Date::from_ymd(2020, 1, 1).unwrap();
        assert!(gilt.accrued_interest(too_early, &ukc()).is_err());
    }

    #[test]
    fn test_dirty_minus_accrued_equals_clean() {
        let gilt = sample();
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let accrued = gilt.accrued_interest(settlement, &ukc()).unwrap();
        let clean = dec!(99.50);
        let dirty = gilt.dirty_price(clean, settlement, &ukc()).unwrap();
        assert_eq!(dirty, clean + accrued);
        assert_eq!(gilt.clean_price(dirty, settlement, &ukc()).unwrap(), clean);
    }

    #[test]
    fn test_short_name_format() {
        let gilt = sample();
        assert_eq!(gilt.short_name(), "0.250% 2025-01-31");
    }
}
