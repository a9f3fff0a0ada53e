//! The realized, post-solve cash-flow schedule.

use gilt_core::types::Date;
use rust_decimal::Decimal;

/// One row of the presented cash-flow schedule: `{date, description, in,
/// out, balance, taxable_income}`, all realized to plain numbers.
#[derive(Debug, Clone)]
pub struct CashFlowRow {
    /// The event date.
    pub date: Date,
    /// Human-readable label.
    pub description: String,
    /// Cash credited on this date.
    pub incoming: Decimal,
    /// Cash debited on this date.
    pub outgoing: Decimal,
    /// Running cash balance after this row.
    pub balance: Decimal,
    /// Taxable income accrued by this row.
    pub taxable_income: Decimal,
}

impl CashFlowRow {
    /// True if both `incoming` and `outgoing` are below the presentation
    /// threshold and the row can be dropped from the printed schedule.
    #[must_use]
    pub fn is_negligible(&self) -> bool {
        const THRESHOLD: Decimal = rust_decimal_macros::dec!(0.005);
        self.incoming.abs() < THRESHOLD && self.outgoing.abs() < THRESHOLD
    }
}

/// Drops negligible rows and coalesces consecutive "Interest" rows into one,
/// matching the post-solve presentation rules.
#[must_use]
pub fn present(rows: Vec<CashFlowRow>) -> Vec<CashFlowRow> {
    let mut out: Vec<CashFlowRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.is_negligible() {
            continue;
        }
        if row.description == "Interest" {
            if let Some(last) = out.last_mut() {
                if last.description == "Interest" {
                    last.incoming += row.incoming;
                    last.outgoing += row.outgoing;
                    last.taxable_income += row.taxable_income;
                    last.balance = row.balance;
                    last.date = row.date;
                    continue;
                }
            }
        }
        out.push(row);
    }
    out
}
