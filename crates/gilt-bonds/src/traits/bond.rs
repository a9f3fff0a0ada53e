//! The shared interface implemented by conventional and index-linked gilts.

use gilt_core::types::{CashFlowSchedule, Date};
use gilt_core::Calendar;
use rust_decimal::Decimal;

use crate::error::BondResult;
use crate::types::Isin;

/// Common behaviour of a UK gilt, conventional or index-linked.
///
/// Index-linked gilts delegate the un-indexed arithmetic ([`Gilt::coupon_dates`],
/// the nominal [`Gilt::accrued_interest`]) to an inner conventional gilt and
/// compose in the index ratio on top; see [`crate::index_linked::IndexLinkedGilt`].
pub trait Gilt {
    /// The gilt's ISIN.
    fn isin(&self) -> &Isin;

    /// The date the gilt (or this tranche of it) was first issued.
    fn issue_date(&self) -> Date;

    /// The redemption date.
    fn maturity(&self) -> Date;

    /// The annual coupon rate, in percent of par.
    fn coupon_rate(&self) -> Decimal;

    /// Returns the last coupon date on or before `settlement` and the
    /// ascending tail of coupon dates strictly after it, through maturity.
    fn coupon_dates(&self, settlement: Date, calendar: &dyn Calendar) -> (Date, Vec<Date>);

    /// Accrued interest per 100 nominal as of `settlement`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settlement` falls outside `[issue_date, maturity]`.
    fn accrued_interest(&self, settlement: Date, calendar: &dyn Calendar) -> BondResult<Decimal>;

    /// Converts a clean price to a dirty price at `settlement`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settlement` falls outside `[issue_date, maturity]`.
    fn dirty_price(
        &self,
        clean_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        Ok(clean_price + self.accrued_interest(settlement, calendar)?)
    }

    /// Converts a dirty price to a clean price at `settlement`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settlement` falls outside `[issue_date, maturity]`.
    fn clean_price(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal> {
        Ok(dirty_price - self.accrued_interest(settlement, calendar)?)
    }

    /// Remaining cash flows per 100 nominal from `settlement` to redemption.
    fn cash_flows(&self, settlement: Date, calendar: &dyn Calendar) -> CashFlowSchedule;

    /// Yield to maturity implied by `dirty_price`, as a decimal annual rate.
    ///
    /// # Errors
    ///
    /// Returns `BondError::YieldConvergenceFailed` if the solver does not
    /// converge, or `BondError::InvalidPrice` if `dirty_price` is not positive.
    fn ytm(
        &self,
        dirty_price: Decimal,
        settlement: Date,
        calendar: &dyn Calendar,
    ) -> BondResult<Decimal>;

    /// Present value of the gilt's remaining cash flows, discounted from
    /// `settlement` at the flat annual rate `rate` (actual/365.25).
    fn value(&self, rate: Decimal, settlement: Date, calendar: &dyn Calendar) -> Decimal;

    /// A human-readable short name, e.g. `"0.250% 2025-01-31"`.
    fn short_name(&self) -> String;
}
