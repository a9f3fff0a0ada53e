//! Cash flow type shared by conventional and index-linked gilts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// Type of cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowType {
    /// Regular coupon payment
    Coupon,
    /// Principal repayment at maturity
    Principal,
    /// Combined coupon and principal (final payment)
    CouponAndPrincipal,
    /// Inflation-adjusted coupon
    InflationCoupon,
    /// Inflation-adjusted final payment (coupon and principal)
    InflationCouponAndPrincipal,
}

impl fmt::Display for CashFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowType::Coupon => "Coupon",
            CashFlowType::Principal => "Principal",
            CashFlowType::CouponAndPrincipal => "Coupon+Principal",
            CashFlowType::InflationCoupon => "Inflation Coupon",
            CashFlowType::InflationCouponAndPrincipal => "Inflation Coupon+Principal",
        };
        write!(f, "{name}")
    }
}

/// A dated cash flow.
///
/// Represents a single cash flow occurring on a specific date. Amounts
/// are expressed per 100 nominal, matching the DMO's quoting convention.
///
/// # Example
///
/// ```rust
/// use gilt_core::types::{CashFlow, CashFlowType, Date};
/// use rust_decimal_macros::dec;
///
/// let cf = CashFlow::new(
///     Date::from_ymd(2025, 6, 15).unwrap(),
///     dec!(2.50),
///     CashFlowType::Coupon,
/// );
/// assert_eq!(cf.amount(), dec!(2.50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date
    date: Date,
    /// Cash flow amount per 100 nominal
    amount: Decimal,
    /// Type of cash flow
    cf_type: CashFlowType,
}

impl CashFlow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: Date, amount: Decimal, cf_type: CashFlowType) -> Self {
        Self {
            date,
            amount,
            cf_type,
        }
    }

    /// Creates a coupon cash flow.
    #[must_use]
    pub fn coupon(date: Date, amount: Decimal) -> Self {
        Self::new(date, amount, CashFlowType::Coupon)
    }

    /// Creates a standalone principal repayment cash flow.
    #[must_use]
    pub fn principal(date: Date, amount: Decimal) -> Self {
        Self::new(date, amount, CashFlowType::Principal)
    }

    /// Creates a final cash flow (coupon + principal redemption).
    #[must_use]
    pub fn final_payment(date: Date, coupon: Decimal, principal: Decimal) -> Self {
        Self::new(date, coupon + principal, CashFlowType::CouponAndPrincipal)
    }

    /// Creates an inflation-adjusted coupon cash flow.
    #[must_use]
    pub fn inflation_coupon(date: Date, amount: Decimal) -> Self {
        Self::new(date, amount, CashFlowType::InflationCoupon)
    }

    /// Creates an inflation-adjusted final cash flow.
    #[must_use]
    pub fn inflation_final_payment(date: Date, coupon: Decimal, principal: Decimal) -> Self {
        Self::new(
            date,
            coupon + principal,
            CashFlowType::InflationCouponAndPrincipal,
        )
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the cash flow amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the cash flow type.
    #[must_use]
    pub fn cf_type(&self) -> CashFlowType {
        self.cf_type
    }

    /// Returns true if this cash flow includes principal repayment.
    #[must_use]
    pub fn is_redemption(&self) -> bool {
        matches!(
            self.cf_type,
            CashFlowType::Principal
                | CashFlowType::CouponAndPrincipal
                | CashFlowType::InflationCouponAndPrincipal
        )
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.date, self.amount, self.cf_type)
    }
}

/// An ordered collection of cash flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    /// Ordered list of cash flows
    cash_flows: Vec<CashFlow>,
}

impl CashFlowSchedule {
    /// Creates a new empty cash flow schedule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cash_flows: Vec::new(),
        }
    }

    /// Adds a cash flow to the schedule.
    pub fn push(&mut self, cf: CashFlow) {
        self.cash_flows.push(cf);
    }

    /// Returns the cash flows as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CashFlow] {
        &self.cash_flows
    }

    /// Returns the number of cash flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cash_flows.len()
    }

    /// Returns true if there are no cash flows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cash_flows.is_empty()
    }

    /// Returns an iterator over the cash flows.
    pub fn iter(&self) -> impl Iterator<Item = &CashFlow> {
        self.cash_flows.iter()
    }

    /// Returns the total of all cash flows.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash_flows.iter().map(|cf| cf.amount).sum()
    }

    /// Sorts cash flows by date.
    pub fn sort_by_date(&mut self) {
        self.cash_flows.sort_by_key(|cf| cf.date);
    }
}

impl IntoIterator for CashFlowSchedule {
    type Item = CashFlow;
    type IntoIter = std::vec::IntoIter<CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.cash_flows.into_iter()
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.cash_flows.iter()
    }
}

impl FromIterator<CashFlow> for CashFlowSchedule {
    fn from_iter<I: IntoIterator<Item = CashFlow>>(iter: I) -> Self {
        Self {
            cash_flows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cashflow_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let cf = CashFlow::coupon(date, dec!(2.50));

        assert_eq!(cf.amount(), dec!(2.50));
        assert!(!cf.is_redemption());
    }

    #[test]
    fn test_final_payment() {
        let date = Date::from_ymd(2030, 6, 15).unwrap();
        let cf = CashFlow::final_payment(date, dec!(2.50), dec!(100.0));

        assert_eq!(cf.amount(), dec!(102.50));
        assert!(cf.is_redemption());
    }

    #[test]
    fn test_schedule() {
        let mut schedule = CashFlowSchedule::new();
        schedule.push(CashFlow::coupon(
            Date::from_ymd(2025, 6, 15).unwrap(),
            dec!(2.50),
        ));
        schedule.push(CashFlow::coupon(
            Date::from_ymd(2025, 12, 15).unwrap(),
            dec!(2.50),
        ));

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.total(), dec!(5.0));
    }
}
