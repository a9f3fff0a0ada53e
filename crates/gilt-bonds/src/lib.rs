//! # gilt-bonds
//!
//! Pricing and cash-flow analytics for UK government bonds (gilts), both
//! conventional and RPI-linked.
//!
//! - **Instruments**: [`ConventionalGilt`], [`IndexLinkedGilt`] behind the
//!   shared [`Gilt`] trait
//! - **Cash flows**: coupon-date scheduling, accrued interest, full cash-flow
//!   generation ([`cashflows`])
//! - **Pricing**: yield-to-maturity and present value ([`pricing`])
//!
//! ## Example
//!
//! ```rust
//! use gilt_bonds::{ConventionalGilt, Gilt, Isin};
//! use gilt_core::calendars::UKCalendar;
//! use gilt_core::types::Date;
//! use rust_decimal_macros::dec;
//!
//! let gilt = ConventionalGilt::new(
//!     Isin::new("GB00BMF9LJ31").unwrap(),
//!     Date::from_ymd(2023, 6, 5).unwrap(),
//!     Date::from_ymd(2025, 1, 31).unwrap(),
//!     dec!(0.25),
//! )
//! .unwrap();
//!
//! let settlement = Date::from_ymd(2024, 3, 1).unwrap();
//! let calendar = UKCalendar::new();
//! let accrued = gilt.accrued_interest(settlement, &calendar).unwrap();
//! assert!(accrued > dec!(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cashflows;
pub mod error;
mod gilt;
mod index_linked;
pub mod pricing;
pub mod traits;
pub mod types;

pub use error::{BondError, BondResult};
pub use gilt::ConventionalGilt;
pub use index_linked::IndexLinkedGilt;
pub use traits::Gilt;
pub use types::Isin;

/// Convenient re-exports for common use.
pub mod prelude {
    pub use crate::cashflows::schedule::FirstPeriodKind;
    pub use crate::error::{BondError, BondResult};
    pub use crate::traits::Gilt;
    pub use crate::types::Isin;
    pub use crate::{ConventionalGilt, IndexLinkedGilt};
}
