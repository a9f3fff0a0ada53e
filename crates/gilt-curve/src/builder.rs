//! Builds a maturity-yield table from a priced gilt universe.

use gilt_bonds::Gilt;
use gilt_core::types::Date;
use gilt_core::Calendar;
use gilt_universe::{FilterKind, GiltVariant, IssuedUniverse, PriceBook};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One point on the yield curve.
#[derive(Debug, Clone)]
pub struct CurvePoint {
    /// Years to maturity from settlement, actual/365.25.
    pub maturity_years: Decimal,
    /// Yield in percent of par; real (inflation-adjusted) for index-linked
    /// gilts, nominal otherwise.
    pub yield_pct: Decimal,
    /// The instrument's trading symbol.
    pub tidm: String,
}

const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Builds a maturity-yield curve from a filtered, priced gilt universe.
pub struct YieldCurveBuilder<'a> {
    universe: &'a IssuedUniverse,
    prices: &'a PriceBook,
    calendar: &'a dyn Calendar,
    inflation_rate: Decimal,
}

impl<'a> YieldCurveBuilder<'a> {
    /// Creates a builder. `inflation_rate` is the assumed forward RPI
    /// growth used to convert index-linked nominal YTM to a real yield
    /// (default 3% if unsure).
    #[must_use]
    pub fn new(
        universe: &'a IssuedUniverse,
        prices: &'a PriceBook,
        calendar: &'a dyn Calendar,
        inflation_rate: Decimal,
    ) -> Self {
        Self {
            universe,
            prices,
            calendar,
            inflation_rate,
        }
    }

    /// Builds the curve as of `close_date`, settling on the next business
    /// day. Gilts with no known price are skipped (logged); gilts whose
    /// YTM fails to converge are skipped (logged) rather than failing the
    /// whole build.
    #[must_use]
    pub fn build(&self, close_date: Date, kind: FilterKind) -> Vec<CurvePoint> {
        let settlement = self.calendar.next_business_day(close_date);
        let mut points = Vec::new();

        for gilt in self.universe.filter(kind, settlement, self.calendar) {
            let Some(tidm) = self.prices.tidm_for(gilt.isin()) else {
                log::warn!("no TIDM mapping for {}, skipping", gilt.isin());
                continue;
            };
            let Some(clean_price) = self.prices.clean_price(tidm) else {
                log::warn!("no price for {tidm}, skipping");
                continue;
            };

            let dirty_price = match gilt.dirty_price(clean_price, settlement, self.calendar) {
                Ok(p) => p,
                Err(err) => {
                    log::warn!("could not compute dirty price for {tidm}: {err}");
                    continue;
                }
            };

            let nominal_ytm = match gilt.ytm(dirty_price, settlement, self.calendar) {
                Ok(y) => y,
                Err(err) => {
                    log::warn!("YTM did not converge for {tidm}: {err}");
                    continue;
                }
            };

            let yield_pct = match gilt {
                GiltVariant::IndexLinked(_) => {
                    (Decimal::ONE + nominal_ytm) / (Decimal::ONE + self.inflation_rate)
                        - Decimal::ONE
                }
                GiltVariant::Conventional(_) => nominal_ytm,
            } * Decimal::from(100);

            let maturity_years =
                Decimal::from(gilt.maturity() - settlement) / DAYS_PER_YEAR;

            points.push(CurvePoint {
                maturity_years,
                yield_pct,
                tidm: tidm.to_string(),
            });
        }

        points.sort_by(|a, b| a.maturity_years.cmp(&b.maturity_years));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_bonds::Isin;
    use gilt_core::calendars::UKCalendar;
    use gilt_core::types::RpiSeries;
    use gilt_universe::issued::{FeedRecord, IssuedUniverse};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn ukc() -> UKCalendar {
        UKCalendar::new()
    }

    fn empty_rpi() -> Arc<RpiSeries> {
        Arc::new(RpiSeries::new(&[(2020, 1, dec!(280.0))]).unwrap())
    }

    fn sample_universe() -> IssuedUniverse {
        let record = FeedRecord {
            instrument_name: "Treasury Gilt 0\u{215d}% 2035".to_string(),
            instrument_type: Some("Conventional".to_string()),
            isin_code: "GB00BMF9LJ31".to_string(),
            redemption_date: "2035-01-31".to_string(),
            first_issue_date: "2023-06-05".to_string(),
            base_rpi_87: None,
            current_ex_div_date: None,
            close_of_business_date: None,
        };
        IssuedUniverse::from_records(&[record], empty_rpi()).unwrap()
    }

    #[test]
    fn skips_gilts_with_no_registered_price() {
        let universe = sample_universe();
        let prices = PriceBook::new();
        let builder = YieldCurveBuilder::new(&universe, &prices, &ukc(), dec!(0.03));
        let points = builder.build(Date::from_ymd(2024, 3, 1).unwrap(), FilterKind::Both);
        assert!(points.is_empty());
    }

    #[test]
    fn builds_a_point_for_a_priced_gilt() {
        let universe = sample_universe();
        let mut prices = PriceBook::new();
        let isin = Isin::new("GB00BMF9LJ31").unwrap();
        prices.register_tidm(isin, "T35");
        prices.set_price("T35", dec!(95.0), Date::from_ymd(2024, 3, 1).unwrap());
        let builder = YieldCurveBuilder::new(&universe, &prices, &ukc(), dec!(0.03));
        let points = builder.build(Date::from_ymd(2024, 3, 1).unwrap(), FilterKind::Both);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].tidm, "T35");
        assert!(points[0].maturity_years > Decimal::ZERO);
    }
}
