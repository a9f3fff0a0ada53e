//! Timeline events that drive the LP's cash-balance recurrence.

use gilt_core::types::Date;
use good_lp::Expression;

use crate::description::Description;

/// The kind of a timeline event. Ordered so that, within a single date,
/// coupons and redemptions credit the balance before withdrawals debit it,
/// and tax bookkeeping closes out the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    /// A coupon, redemption, or sale proceeds crediting the balance.
    CashFlow,
    /// A scheduled withdrawal debiting the balance.
    Consumption,
    /// Freezes accrued taxable income into a tax liability and resets the
    /// accrual.
    TaxYearEnd,
    /// Pays the frozen tax liability out of the balance.
    TaxPayment,
}

/// A single point on the ladder's simulated cash-flow timeline.
///
/// Monetary fields are LP expressions until the solve completes; see
/// [`crate::description::Description`] for how descriptions referencing
/// these expressions are rendered after solving.
#[derive(Clone)]
pub struct Event {
    /// The calendar date the event occurs on.
    pub date: Date,
    /// A human-readable label for the eventual cash-flow row.
    pub description: Description,
    /// Determines intra-day ordering relative to other events on the same
    /// date.
    pub kind: EventKind,
    /// Cash credited to the balance on this event (zero if none).
    pub incoming: Expression,
    /// Cash debited from the balance on this event (zero if none).
    pub outgoing: Expression,
    /// Taxable income accrued by this event (zero if none).
    pub taxable_income: Expression,
}

impl Event {
    /// Sorts events by `(date, kind)`, the ordering the solver's balance
    /// recurrence depends on.
    #[must_use]
    pub fn sort_key(&self) -> (Date, EventKind) {
        (self.date, self.kind)
    }
}
