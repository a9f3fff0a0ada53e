//! Business day calendars.
//!
//! Gilt settlement and coupon-scheduling logic only ever needs three
//! operations: is this a business day, what's the next/previous one, and how
//! many business days lie between two dates. There is no generic business-day
//! adjustment convention machinery here, unlike a general-purpose curve
//! library — gilts settle next-business-day and nothing else.

mod bitmap;
mod uk;

pub use bitmap::{HolidayBitmap, HolidayCalendarBuilder, WeekendType};
pub use uk::UKCalendar;

use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Advances a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }

    /// Returns the previous business day on or before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(-1);
        }
        result
    }

    /// Counts business days between two dates (exclusive of start, inclusive of end).
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        date.is_weekday()
    }
}

/// Calendar that combines multiple calendars (joint holidays).
pub struct JointCalendar {
    calendars: Vec<Box<dyn Calendar>>,
}

impl JointCalendar {
    /// Creates a new joint calendar from multiple calendars.
    #[must_use]
    pub fn new(calendars: Vec<Box<dyn Calendar>>) -> Self {
        Self { calendars }
    }
}

impl Calendar for JointCalendar {
    fn name(&self) -> &'static str {
        "Joint Calendar"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.calendars.iter().all(|cal| cal.is_business_day(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;

        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        assert!(cal.is_business_day(monday));

        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        assert!(!cal.is_business_day(saturday));

        let sunday = Date::from_ymd(2025, 1, 5).unwrap();
        assert!(!cal.is_business_day(sunday));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;

        let friday = Date::from_ymd(2025, 1, 3).unwrap();
        let result = cal.add_business_days(friday, 1);
        assert_eq!(result, Date::from_ymd(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_business_days_between() {
        let cal = WeekendCalendar;

        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        let friday = Date::from_ymd(2025, 1, 10).unwrap();

        assert_eq!(cal.business_days_between(monday, friday), 4);
    }

    #[test]
    fn test_joint_calendar_uk_and_weekend() {
        let joint = JointCalendar::new(vec![Box::new(UKCalendar::new()), Box::new(WeekendCalendar)]);
        let new_years_day = Date::from_ymd(2025, 1, 1).unwrap();
        assert!(!joint.is_business_day(new_years_day));
    }
}
