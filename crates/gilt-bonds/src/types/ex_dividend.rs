//! Ex-dividend rules for UK gilts.
//!
//! A gilt goes ex-dividend 7 business days before each coupon date. A
//! trade settling strictly after that date does not receive the coupon;
//! the seller is rebated the accrued interest instead (negative accrued).

use gilt_core::types::Date;
use gilt_core::Calendar;

/// Number of business days before a coupon date that a gilt goes
/// ex-dividend.
pub const EX_DIVIDEND_BUSINESS_DAYS: i32 = 7;

/// Returns the ex-dividend date for a coupon paid on `coupon_date`.
#[must_use]
pub fn ex_dividend_date(coupon_date: Date, calendar: &dyn Calendar) -> Date {
    calendar.add_business_days(coupon_date, -EX_DIVIDEND_BUSINESS_DAYS)
}

/// Returns true if `settlement` falls strictly after the ex-dividend date
/// for `coupon_date`, meaning the buyer will not receive that coupon.
#[must_use]
pub fn is_ex_dividend(settlement: Date, coupon_date: Date, calendar: &dyn Calendar) -> bool {
    settlement > ex_dividend_date(coupon_date, calendar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_core::calendars::UKCalendar;

    #[test]
    fn test_ex_dividend_date_is_seven_business_days_before() {
        let calendar = UKCalendar::new();
        // 15 Jul 2025 is a Tuesday; 7 business days before is 3 Jul 2025.
        let coupon = Date::from_ymd(2025, 7, 15).unwrap();
        let xd = ex_dividend_date(coupon, &calendar);
        assert_eq!(xd, Date::from_ymd(2025, 7, 3).unwrap());
    }

    #[test]
    fn test_settlement_on_xd_date_still_receives_coupon() {
        let calendar = UKCalendar::new();
        let coupon = Date::from_ymd(2025, 7, 15).unwrap();
        let xd = ex_dividend_date(coupon, &calendar);
        assert!(!is_ex_dividend(xd, coupon, &calendar));
    }

    #[test]
    fn test_settlement_after_xd_date_does_not_receive_coupon() {
        let calendar = UKCalendar::new();
        let coupon = Date::from_ymd(2025, 7, 15).unwrap();
        let xd = ex_dividend_date(coupon, &calendar);
        let day_after = calendar.add_business_days(xd, 1);
        assert!(is_ex_dividend(day_after, coupon, &calendar));
    }
}
