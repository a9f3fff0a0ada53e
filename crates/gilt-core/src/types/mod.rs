//! Domain types for gilt analytics.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`CashFlow`]: Dated cash flow amount
//! - [`RpiSeries`]: Retail Prices Index history used to index-link gilts

mod cashflow;
mod date;
mod rpi;

pub use cashflow::{CashFlow, CashFlowSchedule, CashFlowType};
pub use date::Date;
pub use rpi::RpiSeries;
