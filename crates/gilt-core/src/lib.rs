//! # gilt-core
//!
//! Core types and business-day calendars shared across the gilt analytics
//! crates.
//!
//! - **Types**: `Date`, `CashFlow`, `RpiSeries`
//! - **Calendars**: UK bank-holiday calendar and business-day arithmetic
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: Newtypes prevent mixing incompatible values
//! - **Explicit Over Implicit**: Clear, self-documenting APIs
//!
//! ## Example
//!
//! ```rust
//! use gilt_core::prelude::*;
//!
//! let calendar = UKCalendar::global();
//! let settlement = calendar.next_business_day(Date::today());
//! assert!(calendar.is_business_day(settlement));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calendars;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{Calendar, JointCalendar, UKCalendar, WeekendCalendar};
    pub use crate::error::{GiltError, GiltResult};
    pub use crate::types::{CashFlow, CashFlowSchedule, CashFlowType, Date, RpiSeries};
}

// Re-export commonly used types at crate root
pub use error::{GiltError, GiltResult};
pub use types::Date;
