//! Parses DMO instrument records into a filterable universe of gilts.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use gilt_bonds::types::coupon_name::parse_coupon;
use gilt_bonds::types::ex_dividend::ex_dividend_date;
use gilt_bonds::{ConventionalGilt, Gilt, IndexLinkedGilt, Isin};
use gilt_core::types::{Date, RpiSeries};
use gilt_core::Calendar;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{UniverseError, UniverseResult};

const THREE_MONTH_LAG_CUTOFF: (i32, u32, u32) = (2005, 9, 22);

/// One instrument record as read off the DMO feed, before construction.
///
/// The CSV variant of the feed omits `INSTRUMENT_TYPE`; it is derived from
/// whether `base_rpi_87` is present.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRecord {
    #[serde(rename = "INSTRUMENT_NAME")]
    pub instrument_name: String,
    #[serde(rename = "INSTRUMENT_TYPE", default)]
    pub instrument_type: Option<String>,
    #[serde(rename = "ISIN_CODE")]
    pub isin_code: String,
    #[serde(rename = "REDEMPTION_DATE")]
    pub redemption_date: String,
    #[serde(rename = "FIRST_ISSUE_DATE")]
    pub first_issue_date: String,
    #[serde(rename = "BASE_RPI_87", default)]
    pub base_rpi_87: Option<String>,
    #[serde(rename = "CURRENT_EX_DIV_DATE", default)]
    pub current_ex_div_date: Option<String>,
    #[serde(rename = "CLOSE_OF_BUSINESS_DATE", default)]
    pub close_of_business_date: Option<String>,
}

/// Parses the CSV variant of the DMO instrument feed.
///
/// # Errors
///
/// Returns `UniverseError::Csv` if the CSV is malformed.
pub fn parse_csv<R: Read>(reader: R) -> UniverseResult<Vec<FeedRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: FeedRecord = result?;
        records.push(record);
    }
    Ok(records)
}

fn parse_date(field: &str, value: &str) -> UniverseResult<Date> {
    Date::parse(value).map_err(|_| UniverseError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// A gilt in the issued universe: conventional or index-linked, behind the
/// shared [`Gilt`] interface.
#[derive(Clone)]
pub enum GiltVariant {
    /// A fixed-coupon conventional gilt.
    Conventional(ConventionalGilt),
    /// An RPI-linked gilt.
    IndexLinked(IndexLinkedGilt),
}

impl GiltVariant {
    /// True once a 3-month-lag index-linked gilt's redemption is fixed, at
    /// which point it is treated as Conventional for filtering purposes.
    /// Conventional gilts and 8-month-lag linkers are unaffected.
    #[must_use]
    pub fn effectively_conventional(&self) -> bool {
        match self {
            Self::Conventional(_) => true,
            Self::IndexLinked(g) => g.is_three_month_lag() && g.is_redemption_fixed(),
        }
    }

    #[must_use]
    fn is_index_linked(&self) -> bool {
        matches!(self, Self::IndexLinked(_))
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            Self::Conventional(g) => g.$method($($arg),*),
            Self::IndexLinked(g) => g.$method($($arg),*),
        }
    };
}

impl Gilt for GiltVariant {
    fn isin(&self) -> &Isin {
        delegate!(self, isin)
    }

    fn issue_date(&self) -> Date {
        delegate!(self, issue_date)
    }

    fn maturity(&self) -> Date {
        delegate!(self, maturity)
    }

    fn coupon_rate(&self) -> Decimal {
        delegate!(self, coupon_rate)
    }

    fn coupon_dates(&self, settlement: Date, calendar: &dyn Calendar) -> (Date, Vec<Date>) {
        delegate!(self, coupon_dates, settlement, calendar)
    }

    fn accrued_interest(
        &self,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> gilt_bonds::BondResult<Decimal> {
        delegate!(self, accrued_interest, settlement, calendar)
    }

    fn cash_flows(
        &self,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> gilt_core::types::CashFlowSchedule {
        delegate!(self, cash_flows, settlement, calendar)
    }

    fn ytm(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> gilt_bonds::BondResult<Decimal> {
        delegate!(self, ytm, dirty_price, settlement, calendar)
    }

    fn value(&self, rate: Decimal, settlement: Date, calendar: &dyn Calendar) -> Decimal {
        delegate!(self, value, rate, settlement, calendar)
    }

    fn short_name(&self) -> String {
        delegate!(self, short_name)
    }
}

/// Filter predicate for [`IssuedUniverse::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Conventional gilts only (including fixed-redemption linkers).
    Conventional,
    /// Index-linked gilts only (excluding fixed-redemption linkers).
    IndexLinked,
    /// Both kinds.
    Both,
}

/// The universe of gilts issued by the DMO, sorted by maturity.
pub struct IssuedUniverse {
    gilts: Vec<GiltVariant>,
    by_isin: HashMap<Isin, usize>,
}

impl IssuedUniverse {
    /// Builds a universe from parsed feed records.
    ///
    /// `rpi_series` is required only for constructing index-linked gilts;
    /// pass any value if the feed contains none.
    ///
    /// # Errors
    ///
    /// Returns `UniverseError` for a malformed record: unknown instrument
    /// type, unparseable date or coupon, or an invalid ISIN. Per the feed's
    /// construction-time error policy, the whole feed is rejected rather
    /// than silently dropping bad rows.
    pub fn from_records(
        records: &[FeedRecord],
        rpi_series: Arc<RpiSeries>,
    ) -> UniverseResult<Self> {
        let mut gilts = Vec::with_capacity(records.len());
        for record in records {
            gilts.push(build_gilt(record, Arc::clone(&rpi_series))?);
        }
        gilts.sort_by_key(Gilt::maturity);

        let by_isin = gilts
            .iter()
            .enumerate()
            .map(|(i, g)| (g.isin().clone(), i))
            .collect();

        Ok(Self { gilts, by_isin })
    }

    /// All gilts in the universe, sorted by maturity.
    #[must_use]
    pub fn all(&self) -> &[GiltVariant] {
        &self.gilts
    }

    /// Looks up a gilt by ISIN.
    #[must_use]
    pub fn by_isin(&self, isin: &Isin) -> Option<&GiltVariant> {
        self.by_isin.get(isin).map(|&i| &self.gilts[i])
    }

    /// Returns gilts of the requested kind, tradeable as of `settlement`.
    ///
    /// Excludes any gilt whose final ex-dividend date has already passed,
    /// and reclassifies fixed-redemption 3-month linkers as Conventional.
    #[must_use]
    pub fn filter(
        &self,
        kind: FilterKind,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> Vec<&GiltVariant> {
        self.gilts
            .iter()
            .filter(|g| settlement <= ex_dividend_date(g.maturity(), calendar))
            .filter(|g| match kind {
                FilterKind::Both => true,
                FilterKind::Conventional => g.effectively_conventional(),
                FilterKind::IndexLinked => g.is_index_linked() && !g.effectively_conventional(),
            })
            .collect()
    }
}

fn derive_instrument_type(record: &FeedRecord, issue_date: Date) -> UniverseResult<Kind> {
    if let Some(ref raw) = record.instrument_type {
        return match raw.as_str() {
            "Conventional" => Ok(Kind::Conventional),
            "Index-linked 3 months" => Ok(Kind::IndexLinked3m),
            "Index-linked 8 months" => Ok(Kind::IndexLinked8m),
            other => Err(UniverseError::UnknownInstrumentType {
                value: other.to_string(),
                isin: record.isin_code.clone(),
            }),
        };
    }
    // CSV variant: derive from BASE_RPI_87 presence.
    if record.base_rpi_87.is_some() {
        let cutoff = Date::from_ymd(
            THREE_MONTH_LAG_CUTOFF.0,
            THREE_MONTH_LAG_CUTOFF.1,
            THREE_MONTH_LAG_CUTOFF.2,
        )
        .expect("constant date is valid");
        Ok(if issue_date >= cutoff {
            Kind::IndexLinked3m
        } else {
            Kind::IndexLinked8m
        })
    } else {
        Ok(Kind::Conventional)
    }
}

enum Kind {
    Conventional,
    IndexLinked3m,
    IndexLinked8m,
}

fn build_gilt(record: &FeedRecord, rpi_series: Arc<RpiSeries>) -> UniverseResult<GiltVariant> {
    let isin = Isin::new(&record.isin_code)?;
    let maturity = parse_date("REDEMPTION_DATE", &record.redemption_date)?;
    let issue_date = parse_date("FIRST_ISSUE_DATE", &record.first_issue_date)?;
    let coupon_rate = parse_coupon(&record.instrument_name)?;

    match derive_instrument_type(record, issue_date)? {
        Kind::Conventional => {
            let gilt = ConventionalGilt::new(isin, issue_date, maturity, coupon_rate)?;
            Ok(GiltVariant::Conventional(gilt))
        }
        Kind::IndexLinked3m | Kind::IndexLinked8m => {
            let base_rpi_str =
                record
                    .base_rpi_87
                    .as_deref()
                    .ok_or_else(|| UniverseError::MissingField {
                        field: "BASE_RPI_87".to_string(),
                        isin: record.isin_code.clone(),
                    })?;
            let base_rpi: Decimal =
                base_rpi_str
                    .trim()
                    .parse()
                    .map_err(|_| UniverseError::InvalidDate {
                        field: "BASE_RPI_87".to_string(),
                        value: base_rpi_str.to_string(),
                    })?;
            let gilt = IndexLinkedGilt::new(isin, issue_date, maturity, coupon_rate, base_rpi, rpi_series)?;
            Ok(GiltVariant::IndexLinked(gilt))
        }
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
        let mut year = 2010;
        let mut month = 1;
        let mut value = dec!(240.0);
        for _ in 0..240 {
            observations.push((year, month, value));
            value += dec!(0.4);
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        Arc::new(RpiSeries::new(&observations).unwrap())
    }

    fn conventional_record() -> FeedRecord {
        FeedRecord {
            instrument_name: "Treasury Gilt 0\u{215d}% 2035".to_string(),
            instrument_type: Some("Conventional".to_string()),
            isin_code: "GB00BMF9LJ31".to_string(),
            redemption_date: "2035-01-31".to_string(),
            first_issue_date: "2023-06-05".to_string(),
            base_rpi_87: None,
            current_ex_div_date: None,
            close_of_business_date: None,
        }
    }

    #[test]
    fn builds_conventional_gilt_from_record() {
        let universe =
            IssuedUniverse::from_records(&[conventional_record()], sample_rpi()).unwrap();
        assert_eq!(universe.all().len(), 1);
        assert_eq!(universe.all()[0].coupon_rate(), dec!(0.625));
    }

    #[test]
    fn csv_variant_without_instrument_type_derives_conventional() {
        let mut record = conventional_record();
        record.instrument_type = None;
        let universe = IssuedUniverse::from_records(&[record], sample_rpi()).unwrap();
        assert!(matches!(universe.all()[0], GiltVariant::Conventional(_)));
    }

    #[test]
    fn csv_variant_with_base_rpi_derives_index_linked() {
        let mut record = conventional_record();
        record.instrument_type = None;
        record.base_rpi_87 = Some("245.2".to_string());
        let universe = IssuedUniverse::from_records(&[record], sample_rpi()).unwrap();
        assert!(matches!(universe.all()[0], GiltVariant::IndexLinked(_)));
    }

    #[test]
    fn unknown_instrument_type_is_rejected() {
        let mut record = conventional_record();
        record.instrument_type = Some("Something Else".to_string());
        let result = IssuedUniverse::from_records(&[record], sample_rpi());
        assert!(result.is_err());
    }

    #[test]
    fn lookup_by_isin_round_trips() {
        let universe =
            IssuedUniverse::from_records(&[conventional_record()], sample_rpi()).unwrap();
        let isin = Isin::new("GB00BMF9LJ31").unwrap();
        assert!(universe.by_isin(&isin).is_some());
    }

    #[test]
    fn filter_excludes_gilts_past_final_ex_dividend() {
        let universe =
            IssuedUniverse::from_records(&[conventional_record()], sample_rpi()).unwrap();
        let long_past_settlement = Date::from_ymd(2036, 1, 1).unwrap();
        let filtered = universe.filter(FilterKind::Both, long_past_settlement, &ukc());
        assert!(filtered.is_empty());
    }

    #[test]
    fn filter_includes_tradeable_gilt_before_maturity() {
        let universe =
            IssuedUniverse::from_records(&[conventional_record()], sample_rpi()).unwrap();
        let settlement = Date::from_ymd(2030, 1, 1).unwrap();
        let filtered = universe.filter(FilterKind::Conventional, settlement, &ukc());
        assert_eq!(filtered.len(), 1);
        let empty = universe.filter(FilterKind::IndexLinked, settlement, &ukc());
        assert!(empty.is_empty());
    }
}
