//! Ladder solver configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The stress-discount yield used to price optional mid-life sales: a
/// conservative liquidity haircut, not a documented DMO rule.
pub const SALE_STRESS_YIELD: Decimal = dec!(0.10);

/// Configuration for a single ladder solve.
#[derive(Debug, Clone)]
pub struct LadderConfig {
    /// Whether the schedule's consumption amounts are real (inflation
    /// linked) and should be projected to nominal terms using the RPI
    /// series, and whether the candidate universe is restricted to
    /// index-linked gilts.
    pub index_linked: bool,

    /// Marginal UK income-tax rate applied to coupon and interest income.
    /// Zero disables tax-year bookkeeping entirely.
    pub marginal_income_tax: Decimal,

    /// Annualised interest rate credited on idle cash balances.
    pub cash_interest_rate: Decimal,

    /// If set, candidate gilts may mature up to this many years after the
    /// final consumption date, funded by an optional sale at the stress
    /// yield. If `None`, only gilts maturing at or before the final
    /// consumption date are eligible.
    pub sale_lag_years: Option<Decimal>,

    /// Assumed forward RPI growth rate, used to project index-linked
    /// consumption amounts to nominal terms. Ignored unless `index_linked`
    /// is set.
    pub inflation_rate: Decimal,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            index_linked: false,
            marginal_income_tax: Decimal::ZERO,
            cash_interest_rate: Decimal::ZERO,
            sale_lag_years: None,
            inflation_rate: dec!(0.03),
        }
    }
}

impl LadderConfig {
    /// Whether optional mid-life sales are modelled.
    #[must_use]
    pub fn allows_sales(&self) -> bool {
        self.sale_lag_years.is_some()
    }

    /// Whether tax-year bookkeeping events should be generated.
    #[must_use]
    pub fn taxed(&self) -> bool {
        self.marginal_income_tax > Decimal::ZERO
    }
}
