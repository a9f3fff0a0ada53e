//! An index-linked (RPI-linked) gilt.
//!
//! Delegates the un-indexed arithmetic to an inner [`ConventionalGilt`] and
//! composes in the index ratio on top. See
//! <https://www.dmo.gov.uk/media/0ltegugd/igcalc.pdf> for the reference-RPI
//! and rounding conventions this follows.

use std::sync::Arc;

use gilt_core::types::{CashFlow, CashFlowSchedule, Date, RpiSeries};
use gilt_core::Calendar;
use gilt_math::solvers::{xirr, SolverConfig};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{BondError, BondResult};
use crate::gilt::ConventionalGilt;
use crate::traits::Gilt;
use crate::types::Isin;

/// Indexation lag between an RPI observation month and the settlement date
/// it is referenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexationLag {
    /// Gilts first issued on or after 2005-09-22 reference RPI 3 months
    /// prior, interpolated daily within the month.
    ThreeMonth,
    /// Older gilts reference RPI 8 months prior with no interpolation.
    EightMonth,
}

const THREE_MONTH_LAG_CUTOFF: (i32, u32, u32) = (2005, 9, 22);
const DEFAULT_INFLATION_RATE: &str = "0.03";
const DAYS_PER_YEAR: f64 = 365.25;

/// A UK index-linked gilt.
#[derive(Clone)]
pub struct IndexLinkedGilt {
    inner: ConventionalGilt,
    base_rpi: Decimal,
    rpi_series: Arc<RpiSeries>,
    lag: IndexationLag,
    inflation_rate: Decimal,
}

impl IndexLinkedGilt {
    /// Creates a new index-linked gilt.
    ///
    /// # Errors
    ///
    /// Propagates [`ConventionalGilt::new`]'s validation errors.
    pub fn new(
        isin: Isin,
        issue_date: Date,
        maturity: Date,
        coupon_rate: Decimal,
        base_rpi: Decimal,
        rpi_series: Arc<RpiSeries>,
    ) -> BondResult<Self> {
        let inner = ConventionalGilt::new(isin, issue_date, maturity, coupon_rate)?;
        let cutoff = Date::from_ymd(
            THREE_MONTH_LAG_CUTOFF.0,
            THREE_MONTH_LAG_CUTOFF.1,
            THREE_MONTH_LAG_CUTOFF.2,
        )
        .expect("constant date is valid");
        let lag = if issue_date >= cutoff {
            IndexationLag::ThreeMonth
        } else {
            IndexationLag::EightMonth
        };
        Ok(Self {
            inner,
            base_rpi,
            rpi_series,
            lag,
            inflation_rate: DEFAULT_INFLATION_RATE.parse().expect("valid literal"),
        })
    }

    /// Overrides the assumed forward inflation rate used to extrapolate RPI
    /// beyond the published series (default 3%).
    #[must_use]
    pub fn with_inflation_rate(mut self, inflation_rate: Decimal) -> Self {
        self.inflation_rate = inflation_rate;
        self
    }

    fn lag_months(self_lag: IndexationLag) -> i32 {
        match self_lag {
            IndexationLag::ThreeMonth => 3,
            IndexationLag::EightMonth => 8,
        }
    }

    /// The reference RPI used to index a cash flow or price on `date`,
    /// rounded to 5 decimal places.
    #[must_use]
    pub fn ref_rpi(&self, date: Date, calendar: &dyn Calendar) -> Decimal {
        let lag = Self::lag_months(self.lag);
        let ref_rpi = match self.lag {
            IndexationLag::ThreeMonth => {
                let month_idx = self.rpi_series.lookup_index(date) - lag;
                let weight = Decimal::from(date.day() - 1) / Decimal::from(date.days_in_month());
                let rpi0 = self
                    .rpi_series
                    .extrapolate_from_index(month_idx, self.inflation_rate);
                let rpi1 = self
                    .rpi_series
                    .extrapolate_from_index(month_idx + 1, self.inflation_rate);
                rpi0 + weight * (rpi1 - rpi0)
            }
            IndexationLag::EightMonth => {
                let (_, next_coupon) = self.inner.coupon_dates(date, calendar);
                let month_idx = self.rpi_series.lookup_index(next_coupon) - lag;
                self.rpi_series
                    .extrapolate_from_index(month_idx, self.inflation_rate)
            }
        };
        ref_rpi.round_dp(5)
    }

    /// The first month for which the redemption cash flow on `date` is
    /// known, i.e. RPI has been published for the fixing month.
    #[must_use]
    pub fn fixed_date(&self, date: Date) -> Date {
        let start_of_month = date.start_of_month();
        match self.lag {
            IndexationLag::ThreeMonth if date.day() > 1 => start_of_month
                .add_months(-2)
                .expect("month-start dates stay in range"),
            IndexationLag::ThreeMonth => start_of_month
                .add_months(-3)
                .expect("month-start dates stay in range"),
            IndexationLag::EightMonth => start_of_month
                .add_months(-8)
                .expect("month-start dates stay in range"),
        }
    }

    /// Returns true once RPI has been published for `date`'s fixing month.
    #[must_use]
    pub fn is_fixed(&self, date: Date) -> bool {
        self.rpi_series.last_date() >= self.fixed_date(date)
    }

    /// Returns true once the redemption cash flow is known, i.e. this gilt
    /// behaves like a conventional gilt for quoting purposes.
    #[must_use]
    pub fn is_redemption_fixed(&self) -> bool {
        self.is_fixed(self.inner.maturity())
    }

    /// True for gilts indexed with a 3-month lag (issued on or after
    /// 2005-09-22); false for the older 8-month-lag convention.
    #[must_use]
    pub fn is_three_month_lag(&self) -> bool {
        self.lag == IndexationLag::ThreeMonth
    }

    /// `ref_rpi(date) / base_rpi`, rounded to 5 decimal places for 3-month
    /// lag gilts (8-month lag gilts are not rounded, matching the DMO
    /// convention of leaving nominal quotes unrounded).
    #[must_use]
    pub fn index_ratio(&self, date: Date, calendar: &dyn Calendar) -> Decimal {
        let ratio = self.ref_rpi(date, calendar) / self.base_rpi;
        match self.lag {
            IndexationLag::ThreeMonth => ratio.round_dp(5),
            IndexationLag::EightMonth => ratio,
        }
    }

    fn cash_flow_rounding(&self) -> u32 {
        if self.inner.issue_date().year() >= 2002 {
            6
        } else {
            4
        }
    }
}

impl Gilt for IndexLinkedGilt {
    fn isin(&self) -> &Isin {
        self.inner.isin()
    }

    fn issue_date(&self) -> Date {
        self.inner.issue_date()
    }

    fn maturity(&self) -> Date {
        self.inner.maturity()
    }

    fn coupon_rate(&self) -> Decimal {
        self.inner.coupon_rate()
    }

    fn coupon_dates(&self, settlement: Date, calendar: &dyn Calendar) -> (Date, Vec<Date>) {
        self.inner.coupon_dates(settlement, calendar)
    }

    fn accrued_interest(&self, settlement: Date, calendar: &dyn Calendar) -> BondResult<Decimal> {
        let nominal = self.inner.accrued_interest(settlement, calendar)?;
        Ok(nominal * self.index_ratio(settlement, calendar))
    }

    /// For 3-month lag gilts the quoted clean price is *real* (the index
    /// ratio must be applied to reach a dirty nominal price); 8-month lag
    /// gilts already quote nominal prices.
    fn dirty_price(
        &self,
        clean_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        let nominal_clean = match self.lag {
            IndexationLag::ThreeMonth => clean_price * self.index_ratio(settlement, calendar),
            IndexationLag::EightMonth => clean_price,
        };
        Ok(nominal_clean + self.accrued_interest(settlement, calendar)?)
    }

    fn clean_price(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        let nominal_clean = dirty_price - self.accrued_interest(settlement, calendar)?;
        Ok(match self.lag {
            IndexationLag::ThreeMonth => nominal_clean / self.index_ratio(settlement, calendar),
            IndexationLag::EightMonth => nominal_clean,
        })
    }

    fn cash_flows(&self, settlement: Date, calendar: &dyn Calendar) -> CashFlowSchedule {
        let rounding = self.cash_flow_rounding();
        self.inner
            .cash_flows(settlement, calendar)
            .into_iter()
            .map(|cf| {
                let ratio = self.index_ratio(cf.date(), calendar);
                let amount = (cf.amount() * ratio).round_dp(rounding);
                CashFlow::new(cf.date(), amount, cf.cf_type())
            })
            .collect()
    }

    /// Because the conventional closed-form formula handles indexation
    /// poorly, this solves for the XIRR of the actual (indexation-projected)
    /// cash flows against the dirty price instead.
    fn ytm(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        let flows = self.cash_flows(settlement, calendar);
        let mut transactions: Vec<(f64, f64)> =
            vec![(0.0, -dirty_price.to_f64().unwrap_or(0.0))];
        for cf in flows.as_slice() {
            let days = cf.date() - settlement;
            transactions.push((
                days as f64 / DAYS_PER_YEAR,
                cf.amount().to_f64().unwrap_or(0.0),
            ));
        }

        let result = xirr(&transactions, 0.05, &SolverConfig::default()).map_err(|_| {
            BondError::YieldConvergenceFailed {
                iterations: SolverConfig::default().max_iterations,
            }
        })?;

        Decimal::from_f64_retain(result.root)
            .ok_or_else(|| BondError::invalid_price("yield solver produced a non-finite result"))
    }

    fn value(&self, rate: Decimal, settlement: Date, calendar: &dyn Calendar) -> Decimal {
        let rate_f64 = rate.to_f64().unwrap_or(0.0);
        let flows = self.cash_flows(settlement, calendar);
        let mut transactions: Vec<(f64, f64)> = vec![(0.0, 0.0)];
        for cf in flows.as_slice() {
            let days = cf.date() - settlement;
            transactions.push((
                days as f64 / DAYS_PER_YEAR,
                cf.amount().to_f64().unwrap_or(0.0),
            ));
        }
        let pv = gilt_math::solvers::xnpv(rate_f64, &transactions);
        Decimal::from_f64_retain(pv).unwrap_or(Decimal::ZERO)
    }

    fn short_name(&self) -> String {
        format!("{:.3}% IL {}", self.inner.coupon_rate(), self.inner.maturity())
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

    fn sample_rpi() -> Arc<RpiSeries> {
        let mut observations = Vec::new();
        let mut year = 2020;
        let mut month = 1;
        let mut value = dec!(280.0);
        for _ in 0..72 {
            observations.push((year, month, value));
            value += dec!(0.5);
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        Arc::new(RpiSeries::new(&observations).unwrap())
    }

    fn sample_3m_lag() -> IndexLinkedGilt {
        IndexLinkedGilt::new(
            Isin::new("GB00BMF9LJ31").unwrap(),
            Date::from_ymd(2021, 3, 22).unwrap(),
            Date::from_ymd(2026, 3, 22).unwrap(),
            dec!(0.125),
            dec!(285.0),
            sample_rpi(),
        )
        .unwrap()
    }

    #[test]
    fn test_post_2005_issue_uses_three_month_lag() {
        let gilt = sample_3m_lag();
        assert_eq!(gilt.lag, IndexationLag::ThreeMonth);
    }

    #[test]
    fn test_pre_2005_issue_uses_eight_month_lag() {
        let gilt = IndexLinkedGilt::new(
            Isin::new("GB00BMF9LJ31").unwrap(),
            Date::from_ymd(1998, 7, 1).unwrap(),
            Date::from_ymd(2026, 3, 22).unwrap(),
            dec!(2.5),
            dec!(150.0),
            sample_rpi(),
        )
        .unwrap();
        assert_eq!(gilt.lag, IndexationLag::EightMonth);
    }

    #[test]
    fn test_index_ratio_is_rounded_for_three_month_lag() {
        let gilt = sample_3m_lag();
        let settlement = Date::from_ymd(2024, 6, 15).unwrap();
        let ratio = gilt.index_ratio(settlement, &ukc());
        assert_eq!(ratio, ratio.round_dp(5));
    }

    #[test]
    fn test_accrued_interest_scales_with_index_ratio() {
        let gilt = sample_3m_lag();
        let settlement = Date::from_ymd(2024, 6, 15).unwrap();
        let nominal = gilt.inner.accrued_interest(settlement, &ukc()).unwrap();
        let indexed = gilt.accrued_interest(settlement, &ukc()).unwrap();
        let ratio = gilt.index_ratio(settlement, &ukc());
        assert_eq!(indexed.round_dp(6), (nominal * ratio).round_dp(6));
    }

    #[test]
    fn test_short_name_includes_il_marker() {
        let gilt = sample_3m_lag();
        assert!(gilt.short_name().contains("IL"));
    }
}
