//! Maps ISIN to TIDM to clean price, with a single as-of date for the whole
//! snapshot.
//!
//! Grounded on the two LSE price sources: a CSV of `(date, isin, tidm,
//! price)` rows, and a live JSON document per instrument carrying a
//! `midPrice`/`lastprice`-style field.

use std::collections::HashMap;
use std::io::Read;

use gilt_bonds::Isin;
use gilt_core::types::Date;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{UniverseError, UniverseResult};

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    isin: String,
    tidm: String,
    price: Decimal,
}

/// Clean prices keyed by TIDM, with ISIN resolution and a single as-of date.
///
/// Append-only during ingestion; treat as immutable once a solve or curve
/// build begins reading from it.
#[derive(Debug, Default, Clone)]
pub struct PriceBook {
    isin_to_tidm: HashMap<Isin, String>,
    clean_prices: HashMap<String, Decimal>,
    as_of: Option<Date>,
}

impl PriceBook {
    /// Creates an empty price book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an ISIN-to-TIDM mapping, overwriting any prior mapping for
    /// that ISIN.
    pub fn register_tidm(&mut self, isin: Isin, tidm: impl Into<String>) {
        self.isin_to_tidm.insert(isin, tidm.into());
    }

    /// The TIDM registered for `isin`, if any.
    #[must_use]
    pub fn tidm_for(&self, isin: &Isin) -> Option<&str> {
        self.isin_to_tidm.get(isin).map(String::as_str)
    }

    /// Records a clean price for `tidm`, advancing `as_of` if `date` is more
    /// recent than anything seen so far.
    pub fn set_price(&mut self, tidm: impl Into<String>, price: Decimal, date: Date) {
        self.clean_prices.insert(tidm.into(), price);
        self.as_of = Some(self.as_of.map_or(date, |current| current.max(date)));
    }

    /// The clean price quoted for `tidm`, if known.
    #[must_use]
    pub fn clean_price(&self, tidm: &str) -> Option<Decimal> {
        self.clean_prices.get(tidm).copied()
    }

    /// The clean price for the TIDM registered against `isin`, if both the
    /// mapping and the price are known.
    #[must_use]
    pub fn clean_price_for_isin(&self, isin: &Isin) -> Option<Decimal> {
        self.tidm_for(isin).and_then(|tidm| self.clean_price(tidm))
    }

    /// The latest date for which a price was supplied.
    #[must_use]
    pub fn as_of(&self) -> Option<Date> {
        self.as_of
    }

    /// Loads a `date,isin,tidm,price` CSV snapshot, registering both the
    /// ISIN-to-TIDM mapping and the clean price from each row.
    ///
    /// # Errors
    ///
    /// Returns `UniverseError::Csv` if the CSV is malformed, or
    /// `UniverseError::InvalidDate` if a row's date column cannot be parsed.
    pub fn load_csv<R: Read>(&mut self, reader: R) -> UniverseResult<()> {
        let mut rdr = csv::Reader::from_reader(reader);
        for result in rdr.deserialize() {
            let row: PriceRow = result?;
            let date = Date::parse(&row.date).map_err(|_| UniverseError::InvalidDate {
                field: "date".to_string(),
                value: row.date.clone(),
            })?;
            let isin = Isin::new(&row.isin)?;
            self.register_tidm(isin, row.tidm.clone());
            self.set_price(row.tidm, row.price, date);
        }
        Ok(())
    }

    /// Merges a live snapshot: a JSON array of objects, each carrying an
    /// `isin` or `tidm` key and a price under the fallback chain
    /// `midPrice → lastprice`. Instruments missing both a price and an
    /// identifier are skipped; the number of prices updated is returned.
    pub fn load_live_json(&mut self, snapshot: &serde_json::Value, as_of: Date) -> usize {
        let Some(entries) = snapshot.as_array() else {
            return 0;
        };

        let mut updated = 0;
        for entry in entries {
            let tidm = entry
                .get("tidm")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            let isin = entry
                .get("isin")
                .and_then(serde_json::Value::as_str)
                .and_then(|s| Isin::new(s).ok());

            let Some(price) = entry
                .get("midPrice")
                .and_then(serde_json::Value::as_f64)
                .or_else(|| entry.get("lastprice").and_then(serde_json::Value::as_f64))
                .and_then(Decimal::from_f64_retain)
            else {
                continue;
            };

            let Some(tidm) = tidm.or_else(|| {
                isin.as_ref()
                    .and_then(|i| self.tidm_for(i).map(str::to_string))
            }) else {
                continue;
            };

            if let Some(isin) = isin {
                self.register_tidm(isin, tidm.clone());
            }
            self.set_price(tidm, price, as_of);
            updated += 1;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn registers_and_resolves_tidm() {
        let mut book = PriceBook::new();
        let isin = Isin::new("GB00BMF9LJ31").unwrap();
        book.register_tidm(isin.clone(), "TN25");
        book.set_price("TN25", dec!(99.50), Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(book.clean_price_for_isin(&isin), Some(dec!(99.50)));
    }

    #[test]
    fn as_of_tracks_the_latest_price_date() {
        let mut book = PriceBook::new();
        book.set_price("TN25", dec!(99.0), Date::from_ymd(2024, 3, 1).unwrap());
        book.set_price("T26", dec!(100.0), Date::from_ymd(2024, 3, 5).unwrap());
        assert_eq!(book.as_of(), Some(Date::from_ymd(2024, 3, 5).unwrap()));
    }

    #[test]
    fn csv_snapshot_populates_prices_and_tidm_map() {
        let csv_data = "date,isin,tidm,price\n2024-03-01,GB00BMF9LJ31,TN25,99.55\n";
        let mut book = PriceBook::new();
        book.load_csv(csv_data.as_bytes()).unwrap();
        let isin = Isin::new("GB00BMF9LJ31").unwrap();
        assert_eq!(book.clean_price_for_isin(&isin), Some(dec!(99.55)));
    }

    #[test]
    fn live_json_prefers_mid_price_over_lastprice() {
        let mut book = PriceBook::new();
        let snapshot = serde_json::json!([
            {"tidm": "TN25", "midPrice": 99.6, "lastprice": 99.0},
        ]);
        let updated = book.load_live_json(&snapshot, Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(updated, 1);
        assert_eq!(book.clean_price("TN25"), Decimal::from_f64_retain(99.6));
    }

    #[test]
    fn live_json_falls_back_to_lastprice() {
        let mut book = PriceBook::new();
        let snapshot = serde_json::json!([{"tidm": "T26", "lastprice": 101.2}]);
        book.load_live_json(&snapshot, Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(book.clean_price("T26"), Decimal::from_f64_retain(101.2));
    }

    #[test]
    fn live_json_skips_instrument_missing_both_prices() {
        let mut book = PriceBook::new();
        let snapshot = serde_json::json!([{"tidm": "T99"}]);
        let updated = book.load_live_json(&snapshot, Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(updated, 0);
        assert_eq!(book.clean_price("T99"), None);
    }
}
