//! Builds and solves the ladder's linear program.
//!
//! Variables, per §4.G: `initial_cash`, `quantity[tidm]`, optional
//! `sell[tidm, date]`, and one non-negative `balance` variable minted after
//! every event so the balance recurrence is expressed via fresh variables
//! rather than accumulated subtraction, which is the stability requirement
//! called out in the design notes.

use gilt_bonds::Gilt;
use gilt_core::types::{Date, RpiSeries};
use gilt_core::Calendar;
use gilt_universe::{FilterKind, GiltVariant, IssuedUniverse, PriceBook};
use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::cashflow::{present, CashFlowRow};
use crate::config::{LadderConfig, SALE_STRESS_YIELD};
use crate::description::Description;
use crate::error::{LadderError, LadderResult};
use crate::event::{Event, EventKind};
use crate::holding::Holding;
use crate::schedule::Schedule;

const DAYS_PER_YEAR: f64 = 365.25;
const RESIDUAL_BALANCE_TOLERANCE: f64 = 1.0;
const RESIDUAL_INCOME_TOLERANCE: f64 = 0.01;

/// One row of the presented buy list.
#[derive(Debug, Clone)]
pub struct BuyListRow {
    /// Instrument name (its short name).
    pub instrument: String,
    /// Trading symbol.
    pub tidm: String,
    /// Clean price at settlement.
    pub clean_price: Decimal,
    /// Dirty price at settlement.
    pub dirty_price: Decimal,
    /// Gross redemption yield at settlement.
    pub gross_redemption_yield: Decimal,
    /// Units bought.
    pub quantity: Decimal,
    /// `quantity * dirty_price`.
    pub cost: Decimal,
}

/// The solved ladder.
#[derive(Debug, Clone)]
pub struct SolvedLadder {
    /// `initial_cash + sum(quantity * dirty_price)`.
    pub total_cost: Decimal,
    /// The instruments bought, excluding the terminal cash/total rows.
    pub buy_list: Vec<BuyListRow>,
    /// The realized cash-flow schedule.
    pub cash_flow_schedule: Vec<CashFlowRow>,
    /// First-year-equivalent consumption divided by `total_cost`.
    pub withdrawal_rate: Decimal,
    /// XIRR of `(-total_cost` at settlement, all consumption flows).
    pub net_yield: Decimal,
}

/// Builds and solves a minimum-cost gilt ladder against a schedule of
/// future cash requirements.
pub struct LadderSolver<'a> {
    universe: &'a IssuedUniverse,
    prices: &'a PriceBook,
    schedule: &'a Schedule,
    config: &'a LadderConfig,
    settlement: Date,
    calendar: &'a dyn Calendar,
    rpi_series: &'a RpiSeries,
}

struct Candidate<'a> {
    tidm: String,
    gilt: &'a GiltVariant,
    clean_price: Decimal,
}

/// One row of the presented cash-flow schedule before its values are
/// realized against the solved LP: either an event the candidate-building
/// pass emitted, or a synthetic interest credit inserted during the solve
/// loop.
struct Row {
    date: Date,
    description: Description,
    incoming: Expression,
    outgoing: Expression,
    taxable_income: Expression,
    balance_var: Variable,
}

impl<'a> LadderSolver<'a> {
    /// Creates a solver over the given universe, prices, schedule and
    /// configuration. `rpi_series` is only consulted when
    /// `config.index_linked` is set.
    #[must_use]
    pub fn new(
        universe: &'a IssuedUniverse,
        prices: &'a PriceBook,
        schedule: &'a Schedule,
        config: &'a LadderConfig,
        settlement: Date,
        calendar: &'a dyn Calendar,
        rpi_series: &'a RpiSeries,
    ) -> Self {
        Self {
            universe,
            prices,
            schedule,
            config,
            settlement,
            calendar,
            rpi_series,
        }
    }

    fn projected_rpi_growth(&self, date: Date) -> Decimal {
        let rate = self.config.inflation_rate;
        let base = self.rpi_series.extrapolate(self.settlement, rate);
        let at_date = self.rpi_series.extrapolate(date, rate);
        at_date / base
    }

    fn candidates(&self, last_consumption: Date) -> Vec<Candidate<'a>> {
        let lag_years = self.config.sale_lag_years.unwrap_or(Decimal::ZERO);
        let lag_days = (lag_years * Decimal::from(365)).to_i64().unwrap_or(0);
        let horizon = last_consumption.add_days(lag_days);

        let kind = if self.config.index_linked {
            FilterKind::IndexLinked
        } else {
            FilterKind::Conventional
        };

        self.universe
            .filter(kind, self.settlement, self.calendar)
            .into_iter()
            .filter(|g| g.maturity() <= horizon)
            .filter_map(|g| {
                let tidm = self.prices.tidm_for(g.isin())?.to_string();
                let clean_price = self.prices.clean_price(&tidm)?;
                Some(Candidate {
                    tidm,
                    gilt: g,
                    clean_price,
                })
            })
            .collect()
    }

    fn push_consumption_events(&self, events: &mut Vec<Event>) {
        for &(date, amount) in self.schedule.entries() {
            let nominal = if self.config.index_linked {
                amount * self.projected_rpi_growth(date)
            } else {
                amount
            };
            let outgoing = Expression::from(nominal.to_f64().unwrap_or(0.0));
            events.push(Event {
                date,
                description: Description::literal("Withdrawal"),
                kind: EventKind::Consumption,
                incoming: Expression::from(0.0),
                outgoing,
                taxable_income: Expression::from(0.0),
            });
        }
    }

    fn push_tax_events(&self, events: &mut Vec<Event>, last_consumption: Date) {
        let mut year = self.settlement.year();
        let mut year_end = Date::from_ymd(year, 4, 5).expect("valid calendar date");
        if year_end <= self.settlement {
            year += 1;
            year_end = Date::from_ymd(year, 4, 5).expect("valid calendar date");
        }
        while year_end <= last_consumption {
            events.push(Event {
                date: year_end,
                description: Description::literal("Tax year end"),
                kind: EventKind::TaxYearEnd,
                incoming: Expression::from(0.0),
                outgoing: Expression::from(0.0),
                taxable_income: Expression::from(0.0),
            });
            let payment_date =
                Date::from_ymd(year_end.year() + 1, 1, 31).expect("valid calendar date");
            events.push(Event {
                date: payment_date,
                description: Description::literal("Income tax"),
                kind: EventKind::TaxPayment,
                incoming: Expression::from(0.0),
                outgoing: Expression::from(0.0),
                taxable_income: Expression::from(0.0),
            });
            year += 1;
            year_end = Date::from_ymd(year, 4, 5).expect("valid calendar date");
        }
    }

    /// Emits one `CASH_FLOW` event per projected coupon/redemption, plus
    /// optional sale events at consumption dates before maturity if the
    /// configuration allows sales. Coupon and sale events carry a taxable
    /// income contribution; redemption (principal) events do not.
    fn push_cash_flow_events(
        &self,
        events: &mut Vec<Event>,
        holding: &Holding<'a>,
        vars: &mut ProblemVariables,
    ) -> LadderResult<Vec<Variable>> {
        let gilt = holding.gilt;
        let flows = gilt.cash_flows(self.settlement, self.calendar);
        let maturity = gilt.maturity();

        let mut sale_vars = Vec::new();
        if self.config.allows_sales() {
            for &(date, _) in self.schedule.entries() {
                if date > self.settlement && date < maturity {
                    sale_vars.push((date, vars.add(variable().min(0))));
                }
            }
        }

        for (sale_date, sell_var) in &sale_vars {
            let own_price = gilt.value(holding.ytm, *sale_date, self.calendar);
            let stress_price = gilt.value(SALE_STRESS_YIELD, *sale_date, self.calendar);
            let discount = if own_price.is_zero() {
                Decimal::ZERO
            } else {
                stress_price / own_price - Decimal::ONE
            };
            let proceeds_per_unit = stress_price.to_f64().unwrap_or(0.0);
            let sale_accrued = gilt.accrued_interest(*sale_date, self.calendar)?;
            let income_per_unit = sale_accrued.to_f64().unwrap_or(0.0);

            events.push(Event {
                date: *sale_date,
                description: Description::templated(
                    &format!(
                        "Sell {} (discount {:.2}%): ",
                        holding.tidm,
                        discount * Decimal::from(100)
                    ),
                    Expression::from(*sell_var),
                    " units",
                ),
                kind: EventKind::CashFlow,
                incoming: Expression::from(*sell_var) * proceeds_per_unit,
                outgoing: Expression::from(0.0),
                taxable_income: Expression::from(*sell_var) * income_per_unit,
            });
        }

        for cf in flows.as_slice() {
            let sold_by_date: Expression = sale_vars
                .iter()
                .filter(|(d, _)| *d <= cf.date())
                .fold(Expression::from(0.0), |acc, (_, v)| acc + Expression::from(*v));
            let remaining = Expression::from(holding.quantity) - sold_by_date;
            let per_unit = cf.amount().to_f64().unwrap_or(0.0);
            let incoming = remaining.clone() * per_unit;
            let taxable_income = if cf.is_redemption() {
                Expression::from(0.0)
            } else {
                incoming.clone()
            };

            events.push(Event {
                date: cf.date(),
                description: Description::templated(
                    &format!("{} cash flow: ", holding.tidm),
                    remaining,
                    " units remaining",
                ),
                kind: EventKind::CashFlow,
                incoming,
                outgoing: Expression::from(0.0),
                taxable_income,
            });
        }

        Ok(sale_vars.into_iter().map(|(_, v)| v).collect())
    }

    /// Builds the LP, solves it, and presents the result.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::Infeasible` if the schedule cannot be funded,
    /// `LadderError::Solver` for any other solver failure, and
    /// `LadderError::InvariantViolated` if the solution violates the
    /// post-solve residual-balance or residual-income tolerances.
    pub fn solve(&self) -> LadderResult<SolvedLadder> {
        let last_consumption = self.schedule.last_date().ok_or(LadderError::Infeasible)?;
        let candidates = self.candidates(last_consumption);
        if candidates.is_empty() {
            return Err(LadderError::Infeasible);
        }

        let mut vars = ProblemVariables::new();
        let initial_cash = vars.add(variable().min(0));

        let mut holdings = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let accrued_interest = candidate
                .gilt
                .accrued_interest(self.settlement, self.calendar)?;
            let dirty_price = candidate.clean_price + accrued_interest;
            let ytm = candidate.gilt.ytm(dirty_price, self.settlement, self.calendar)?;
            let quantity = vars.add(variable().min(0));
            holdings.push(Holding {
                tidm: candidate.tidm.clone(),
                isin: candidate.gilt.isin().clone(),
                gilt: candidate.gilt,
                clean_price: candidate.clean_price,
                dirty_price,
                accrued_interest,
                ytm,
                quantity,
            });
        }

        let mut events = Vec::new();
        self.push_consumption_events(&mut events);
        if self.config.taxed() {
            self.push_tax_events(&mut events, last_consumption);
        }

        let mut sale_var_constraints: Vec<(Variable, Vec<Variable>)> = Vec::new();
        for holding in &holdings {
            let sale_vars = self.push_cash_flow_events(&mut events, holding, &mut vars)?;
            if !sale_vars.is_empty() {
                sale_var_constraints.push((holding.quantity, sale_vars));
            }
        }

        events.sort_by_key(Event::sort_key);

        let mut constraints = Vec::new();
        for (quantity, sale_vars) in &sale_var_constraints {
            let total: Expression = sale_vars
                .iter()
                .fold(Expression::from(0.0), |acc, v| acc + Expression::from(*v));
            constraints.push(constraint!(Expression::from(*quantity) - total >= 0.0));
        }

        // Initial taxable income is negative: the accrued interest paid as
        // part of the dirty price on settlement is returned in the first
        // coupon received, so it must not be taxed again.
        let mut accrued_income: Expression = holdings.iter().fold(
            Expression::from(0.0),
            |acc, h| acc - Expression::from(h.quantity) * h.accrued_interest.to_f64().unwrap_or(0.0),
        );

        let mut rows: Vec<Row> = Vec::new();
        let mut running_balance: Expression = Expression::from(initial_cash);
        let mut tax_due: Expression = Expression::from(0.0);
        let mut previous_date = self.settlement;
        let marginal_rate = self.config.marginal_income_tax.to_f64().unwrap_or(0.0);
        let cash_rate = self.config.cash_interest_rate.to_f64().unwrap_or(0.0);

        for event in &events {
            if cash_rate > 0.0 && event.date > previous_date && previous_date <= last_consumption
            {
                let days = (event.date - previous_date) as f64;
                let interest = running_balance.clone() * (cash_rate * days / DAYS_PER_YEAR);
                running_balance = running_balance + interest.clone();
                accrued_income = accrued_income + interest.clone();

                let interest_var = vars.add(variable().min(0));
                constraints.push(constraint!(
                    Expression::from(interest_var) == running_balance.clone()
                ));
                rows.push(Row {
                    date: event.date,
                    description: Description::literal("Interest"),
                    incoming: interest.clone(),
                    outgoing: Expression::from(0.0),
                    taxable_income: interest,
                    balance_var: interest_var,
                });
                running_balance = Expression::from(interest_var);
            }
            previous_date = event.date;

            running_balance = running_balance + event.incoming.clone();
            accrued_income = accrued_income + event.taxable_income.clone();

            match event.kind {
                EventKind::TaxYearEnd => {
                    tax_due = accrued_income.clone() * marginal_rate;
                    accrued_income = Expression::from(0.0);
                }
                EventKind::TaxPayment => {
                    running_balance = running_balance - tax_due.clone();
                }
                EventKind::CashFlow | EventKind::Consumption => {}
            }
            running_balance = running_balance - event.outgoing.clone();

            let balance_var = vars.add(variable().min(0));
            constraints.push(constraint!(Expression::from(balance_var) == running_balance.clone()));
            rows.push(Row {
                date: event.date,
                description: event.description.clone(),
                incoming: event.incoming.clone(),
                outgoing: event.outgoing.clone(),
                taxable_income: event.taxable_income.clone(),
                balance_var,
            });
            running_balance = Expression::from(balance_var);
        }

        let objective: Expression = holdings.iter().fold(
            Expression::from(initial_cash),
            |acc, h| acc + Expression::from(h.quantity) * h.dirty_price.to_f64().unwrap_or(0.0),
        );

        let mut problem = vars.minimise(objective.clone()).using(microlp);
        for c in constraints {
            problem = problem.with(c);
        }
        let solution = problem.solve().map_err(|e| {
            let message = e.to_string();
            if message.to_lowercase().contains("infeasible") {
                LadderError::Infeasible
            } else {
                LadderError::Solver(message)
            }
        })?;

        self.check_residuals(&solution, &rows, &accrued_income)?;
        self.present_solution(&solution, &holdings, initial_cash, &rows, last_consumption)
    }

    fn check_residuals(
        &self,
        solution: &impl Solution,
        rows: &[Row],
        final_accrued_income: &Expression,
    ) -> LadderResult<()> {
        if let Some(last) = rows.last() {
            let residual = solution.value(last.balance_var);
            if residual > RESIDUAL_BALANCE_TOLERANCE {
                return Err(LadderError::InvariantViolated(format!(
                    "residual cash balance {residual:.2} exceeds tolerance"
                )));
            }
        }
        if self.config.taxed() {
            let residual_income = final_accrued_income.eval_with(solution);
            if residual_income > RESIDUAL_INCOME_TOLERANCE {
                return Err(LadderError::InvariantViolated(format!(
                    "residual accrued income {residual_income:.4} exceeds tolerance"
                )));
            }
        }
        Ok(())
    }

    fn present_solution(
        &self,
        solution: &impl Solution,
        holdings: &[Holding<'a>],
        initial_cash: Variable,
        rows: &[Row],
        last_consumption: Date,
    ) -> LadderResult<SolvedLadder> {
        let cash = Decimal::from_f64_retain(solution.value(initial_cash)).unwrap_or(Decimal::ZERO);

        let mut buy_list = Vec::new();
        let mut total_cost = cash;
        for holding in holdings {
            let quantity = Decimal::from_f64_retain(solution.value(holding.quantity))
                .unwrap_or(Decimal::ZERO)
                .round_dp(4);
            if quantity.is_zero() {
                continue;
            }
            let cost = quantity * holding.dirty_price;
            total_cost += cost;
            let gross_redemption_yield = if self.config.index_linked {
                (Decimal::ONE + holding.ytm) / (Decimal::ONE + self.config.inflation_rate)
                    - Decimal::ONE
            } else {
                holding.ytm
            };
            buy_list.push(BuyListRow {
                instrument: holding.gilt.short_name(),
                tidm: holding.tidm.clone(),
                clean_price: holding.clean_price,
                dirty_price: holding.dirty_price,
                gross_redemption_yield,
                quantity,
                cost,
            });
        }
        buy_list.push(BuyListRow {
            instrument: "Cash".to_string(),
            tidm: String::new(),
            clean_price: Decimal::ZERO,
            dirty_price: Decimal::ZERO,
            gross_redemption_yield: Decimal::ZERO,
            quantity: Decimal::ZERO,
            cost: cash,
        });
        buy_list.push(BuyListRow {
            instrument: "Total".to_string(),
            tidm: String::new(),
            clean_price: Decimal::ZERO,
            dirty_price: Decimal::ZERO,
            gross_redemption_yield: Decimal::ZERO,
            quantity: Decimal::ZERO,
            cost: total_cost,
        });

        let mut presented_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let real_terms_divisor = if self.config.index_linked {
                self.projected_rpi_growth(row.date)
            } else {
                Decimal::ONE
            };
            let restate = |value: f64| -> Decimal {
                let realized = Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO);
                if real_terms_divisor.is_zero() {
                    realized
                } else {
                    (realized / real_terms_divisor).round_dp(2)
                }
            };
            presented_rows.push(CashFlowRow {
                date: row.date,
                description: row.description.render(solution),
                incoming: restate(row.incoming.eval_with(solution)),
                outgoing: restate(row.outgoing.eval_with(solution)),
                balance: restate(solution.value(row.balance_var)),
                taxable_income: restate(row.taxable_income.eval_with(solution)),
            });
        }
        let cash_flow_schedule = present(presented_rows);

        let withdrawal_rate = self
            .schedule
            .entries()
            .first()
            .map(|&(_, amount)| {
                if total_cost.is_zero() {
                    Decimal::ZERO
                } else {
                    amount / total_cost
                }
            })
            .unwrap_or(Decimal::ZERO);

        let net_yield = self.net_yield(total_cost, last_consumption);

        Ok(SolvedLadder {
            total_cost,
            buy_list,
            cash_flow_schedule,
            withdrawal_rate,
            net_yield,
        })
    }

    fn net_yield(&self, total_cost: Decimal, _last_consumption: Date) -> Decimal {
        let mut transactions: Vec<(f64, f64)> = vec![(0.0, -total_cost.to_f64().unwrap_or(0.0))];
        for &(date, amount) in self.schedule.entries() {
            let days = (date - self.settlement) as f64;
            transactions.push((days / DAYS_PER_YEAR, amount.to_f64().unwrap_or(0.0)));
        }
        gilt_math::solvers::xirr(&transactions, 0.03, &gilt_math::solvers::SolverConfig::default())
            .ok()
            .and_then(|r| Decimal::from_f64_retain(r.root))
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gilt_core::calendars::UKCalendar;
    use gilt_universe::issued::FeedRecord;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn ukc() -> UKCalendar {
        UKCalendar::new()
    }

    fn empty_rpi() -> RpiSeries {
        RpiSeries::new(&[(2020, 1, dec!(280.0))]).unwrap()
    }

    fn ladder_record() -> FeedRecord {
        FeedRecord {
            instrument_name: "Treasury Gilt 4\u{00bd}% 2030".to_string(),
            instrument_type: Some("Conventional".to_string()),
            isin_code: "GB00BMF9LJ31".to_string(),
            redemption_date: "2030-01-31".to_string(),
            first_issue_date: "2020-06-05".to_string(),
            base_rpi_87: None,
            current_ex_div_date: None,
            close_of_business_date: None,
        }
    }

    fn priced_universe(rpi: Arc<RpiSeries>, settlement: Date) -> (IssuedUniverse, PriceBook) {
        let universe = IssuedUniverse::from_records(&[ladder_record()], rpi).unwrap();
        let isin = gilt_bonds::Isin::new("GB00BMF9LJ31").unwrap();
        let mut prices = PriceBook::new();
        prices.register_tidm(isin, "T30");
        prices.set_price("T30", dec!(101.50), settlement);
        (universe, prices)
    }

    #[test]
    fn funds_a_single_withdrawal() {
        let rpi = Arc::new(empty_rpi());
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let (universe, prices) = priced_universe(rpi.clone(), settlement);
        let mut schedule = Schedule::new();
        schedule.push(Date::from_ymd(2029, 1, 1).unwrap(), dec!(1000.0));
        let config = LadderConfig::default();
        let calendar = ukc();

        let solver = LadderSolver::new(&universe, &prices, &schedule, &config, settlement, &calendar, &rpi);
        let solved = solver.solve().expect("schedule should be fundable");

        assert!(!solved.buy_list.is_empty());
        assert!(solved.total_cost > Decimal::ZERO);
        assert!(!solved.cash_flow_schedule.is_empty());
        for row in &solved.cash_flow_schedule {
            assert!(row.balance >= Decimal::ZERO, "negative balance on {row:?}");
        }
    }

    #[test]
    fn taxes_coupon_income_across_tax_years() {
        let rpi = Arc::new(empty_rpi());
        let settlement = Date::from_ymd(2024, 3, 1).unwrap();
        let (universe, prices) = priced_universe(rpi.clone(), settlement);
        let mut schedule = Schedule::new();
        schedule.push(Date::from_ymd(2025, 3, 1).unwrap(), dec!(200.0));
        schedule.push(Date::from_ymd(2026, 3, 1).unwrap(), dec!(200.0));
        schedule.push(Date::from_ymd(2027, 3, 1).unwrap(), dec!(200.0));
        let config = LadderConfig {
            marginal_income_tax: dec!(0.40),
            ..LadderConfig::default()
        };
        let calendar = ukc();

        let solver = LadderSolver::new(&universe, &prices, &schedule, &config, settlement, &calendar, &rpi);
        let solved = solver.solve().expect("tax-enabled schedule should be fundable");

        assert!(solved
            .cash_flow_schedule
            .iter()
            .any(|row| row.description == "Income tax"));
        for row in &solved.cash_flow_schedule {
            assert!(row.balance >= Decimal::ZERO, "negative balance on {row:?}");
        }
    }
}
