//! A candidate gilt position in the ladder's LP.

use gilt_bonds::Isin;
use gilt_universe::GiltVariant;
use good_lp::Variable;
use rust_decimal::Decimal;

/// A candidate gilt the solver may buy into, with its LP quantity variable.
#[derive(Clone)]
pub struct Holding<'a> {
    /// The instrument's TIDM (trading symbol).
    pub tidm: String,
    /// The instrument's ISIN.
    pub isin: Isin,
    /// The underlying gilt, for `short_name()`, `ytm()` and `accrued_interest()`.
    pub gilt: &'a GiltVariant,
    /// Quoted clean price as of settlement.
    pub clean_price: Decimal,
    /// Dirty price (clean + accrued interest) as of settlement.
    pub dirty_price: Decimal,
    /// Accrued interest per 100 nominal as of settlement.
    pub accrued_interest: Decimal,
    /// Units purchased at settlement, fractional, non-negative.
    pub quantity: Variable,
}
