//! Retail Prices Index (RPI) series used to index-link gilts.
//!
//! The Office for National Statistics publishes one RPI observation per
//! calendar month (series identifier CHAW). `RpiSeries` stores that history
//! and extrapolates forward from the last published value at an assumed
//! annual inflation rate when asked for a month beyond it.

use rust_decimal::Decimal;

use super::Date;
use crate::error::{GiltError, GiltResult};

/// A monotone, gap-free monthly RPI history with forward extrapolation.
///
/// Observations must be supplied in chronological order starting from some
/// base (year, month) with no gaps; the series is stored as a flat `Vec`
/// indexed by month offset from that base.
#[derive(Debug, Clone)]
pub struct RpiSeries {
    base_year: i32,
    base_month: u32,
    values: Vec<Decimal>,
}

impl RpiSeries {
    /// Builds a series from an ordered, gap-free list of (year, month, value) observations.
    ///
    /// # Errors
    ///
    /// Returns `GiltError::RpiError` if the observations are empty or not
    /// contiguous month-on-month.
    pub fn new(observations: &[(i32, u32, Decimal)]) -> GiltResult<Self> {
        let Some(&(base_year, base_month, first)) = observations.first() else {
            return Err(GiltError::rpi_error("RPI series has no observations"));
        };

        let mut values = Vec::with_capacity(observations.len());
        values.push(first);

        let mut expected = month_offset(base_year, base_month, base_year, base_month);
        for &(year, month, value) in &observations[1..] {
            expected += 1;
            let offset = month_offset(base_year, base_month, year, month);
            if offset != expected {
                return Err(GiltError::rpi_error(format!(
                    "non-contiguous RPI observation at {year}-{month:02}"
                )));
            }
            values.push(value);
        }

        Ok(Self {
            base_year,
            base_month,
            values,
        })
    }

    /// The last month for which an observation exists.
    #[must_use]
    pub fn last_date(&self) -> Date {
        let offset = self.values.len() as i32 - 1;
        let (year, month) = add_months(self.base_year, self.base_month, offset);
        Date::from_ymd(year, month, 1).expect("month-start dates are always valid")
    }

    /// Returns the index position of the month containing `date`.
    ///
    /// The index may exceed the stored range; callers pass it to
    /// [`Self::extrapolate_from_index`] to resolve a value regardless.
    #[must_use]
    pub fn lookup_index(&self, date: Date) -> i32 {
        month_offset(self.base_year, self.base_month, date.year(), date.month())
    }

    /// Resolves an index position to an RPI value, extrapolating beyond the
    /// stored range at a monthly-compounded `rate` (annual, e.g. `0.03` for 3%).
    #[must_use]
    pub fn extrapolate_from_index(&self, index: i32, rate: Decimal) -> Decimal {
        let last_index = self.values.len() as i32 - 1;
        if index <= last_index {
            let clamped = index.max(0) as usize;
            return self.values[clamped];
        }

        let monthly_rate = monthly_compound_rate(rate);
        let months_beyond = (index - last_index) as u32;
        let mut value = self.values[last_index as usize];
        for _ in 0..months_beyond {
            value *= Decimal::ONE + monthly_rate;
        }
        value
    }

    /// Convenience wrapper combining [`Self::lookup_index`] and
    /// [`Self::extrapolate_from_index`] for a calendar date.
    #[must_use]
    pub fn extrapolate(&self, date: Date, rate: Decimal) -> Decimal {
        let index = self.lookup_index(date);
        self.extrapolate_from_index(index, rate)
    }
}

/// Converts an annual rate to the equivalent monthly-compounded rate:
/// `(1+rate)^(1/12) - 1`, evaluated via f64 and rounded back into `Decimal`.
fn monthly_compound_rate(rate: Decimal) -> Decimal {
    let annual: f64 = rate.try_into().unwrap_or(0.0);
    let monthly = (1.0 + annual).powf(1.0 / 12.0) - 1.0;
    Decimal::from_f64_retain(monthly).unwrap_or(Decimal::ZERO)
}

fn month_offset(base_year: i32, base_month: u32, year: i32, month: u32) -> i32 {
    (year - base_year) * 12 + (month as i32 - base_month as i32)
}

fn add_months(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + offset;
    let new_year = total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    (new_year, new_month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_series() -> RpiSeries {
        RpiSeries::new(&[
            (2023, 1, dec!(378.0)),
            (2023, 2, dec!(379.2)),
            (2023, 3, dec!(381.0)),
        ])
        .unwrap()
    }

    #[test]
    fn last_date_matches_final_observation() {
        let series = sample_series();
        assert_eq!(series.last_date(), Date::from_ymd(2023, 3, 1).unwrap());
    }

    #[test]
    fn lookup_within_range_returns_stored_value() {
        let series = sample_series();
        let d = Date::from_ymd(2023, 2, 15).unwrap();
        let idx = series.lookup_index(d);
        assert_eq!(series.extrapolate_from_index(idx, dec!(0.03)), dec!(379.2));
    }

    #[test]
    fn extrapolation_beyond_range_compounds_monthly() {
        let series = sample_series();
        let d = Date::from_ymd(2023, 4, 1).unwrap();
        let idx = series.lookup_index(d);
        let extrapolated = series.extrapolate_from_index(idx, dec!(0.03));
        assert!(extrapolated > dec!(381.0));
    }

    #[test]
    fn rejects_non_contiguous_observations() {
        let result = RpiSeries::new(&[(2023, 1, dec!(378.0)), (2023, 3, dec!(381.0))]);
        assert!(result.is_err());
    }
}
