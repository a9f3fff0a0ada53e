//! A schedule of future cash requirements.

use gilt_core::types::Date;
use rust_decimal::Decimal;

/// An ordered sequence of `(date, nominal_amount)` withdrawals the ladder
/// must fund.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<(Date, Decimal)>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a withdrawal, keeping entries sorted by date.
    pub fn push(&mut self, date: Date, amount: Decimal) {
        let pos = self
            .entries
            .partition_point(|&(d, _)| d <= date);
        self.entries.insert(pos, (date, amount));
    }

    /// The withdrawals, sorted by date.
    #[must_use]
    pub fn entries(&self) -> &[(Date, Decimal)] {
        &self.entries
    }

    /// The date of the final withdrawal.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.entries.last().map(|&(d, _)| d)
    }
}

impl FromIterator<(Date, Decimal)> for Schedule {
    fn from_iter<T: IntoIterator<Item = (Date, Decimal)>>(iter: T) -> Self {
        let mut schedule = Self::new();
        for (date, amount) in iter {
            schedule.push(date, amount);
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_entries_sorted() {
        let mut schedule = Schedule::new();
        schedule.push(Date::from_ymd(2026, 1, 1).unwrap(), Decimal::from(100));
        schedule.push(Date::from_ymd(2025, 1, 1).unwrap(), Decimal::from(50));
        let dates: Vec<_> = schedule.entries().iter().map(|&(d, _)| d).collect();
        assert_eq!(
            dates,
            vec![
                Date::from_ymd(2025, 1, 1).unwrap(),
                Date::from_ymd(2026, 1, 1).unwrap()
            ]
        );
    }

    #[test]
    fn last_date_is_the_final_withdrawal() {
        let schedule: Schedule = vec![
            (Date::from_ymd(2025, 1, 1).unwrap(), Decimal::from(50)),
            (Date::from_ymd(2027, 1, 1).unwrap(), Decimal::from(75)),
        ]
        .into_iter()
        .collect();
        assert_eq!(schedule.last_date(), Some(Date::from_ymd(2027, 1, 1).unwrap()));
    }
}
