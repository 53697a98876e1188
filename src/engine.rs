//! Core debt payoff simulation.
//!
//! A run orders the active loans once by strategy, then advances them one
//! month at a time: interest accrues on every open balance, minimums are paid
//! in priority order, and whatever is left of the budget goes to the first
//! loan that still has a balance. The run stops when the combined balance
//! reaches the payoff epsilon, the month bound is hit, or a growing balance
//! leaves the range `Decimal` can represent.

use crate::config::{SimulationConfig, MAX_AMOUNT};
use crate::decimal::Money;
use crate::error::{EngineError, Result};
use crate::loan::{validate_loans, LoanSnapshot, WorkingLoan};
use crate::schedule::{LoanMonthDetail, MonthRecord, Schedule, ScheduleStatus};
use crate::strategy::Strategy;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

/// The debt payoff simulator.
///
/// Holds only configuration; every call works on its own copy of the loan
/// state, so one engine can serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct PayoffEngine {
    config: SimulationConfig,
}

impl PayoffEngine {
    /// Creates an engine with the default 600-month bound.
    pub fn new() -> Self {
        PayoffEngine::default()
    }

    /// Creates an engine with explicit settings.
    pub fn with_config(config: SimulationConfig) -> Self {
        PayoffEngine { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Builds the month-by-month schedule for one strategy and budget.
    ///
    /// Budget shortfalls and empty loan sets are reported through the
    /// schedule's status. Malformed snapshots or settings are errors.
    pub fn simulate(
        &self,
        loans: &[LoanSnapshot],
        strategy: Strategy,
        monthly_budget: Decimal,
    ) -> Result<Schedule> {
        self.config.validate()?;
        validate_loans(loans)?;
        validate_budget(monthly_budget)?;

        let budget = Money::round(monthly_budget);
        let ordered = strategy.prioritize(loans);

        if ordered.is_empty() {
            info!("No active loans to simulate");
            return Ok(Schedule::empty(
                ScheduleStatus::NoActiveLoans,
                strategy,
                budget,
            ));
        }

        let total_minimum: Decimal = ordered.iter().map(|l| l.minimum_payment).sum();
        if monthly_budget <= Decimal::ZERO || monthly_budget < total_minimum {
            let shortfall = (total_minimum - monthly_budget).max(Decimal::ZERO);
            info!(
                "Budget {} does not cover minimum payments of {} (short by {})",
                monthly_budget, total_minimum, shortfall
            );
            let mut schedule =
                Schedule::empty(ScheduleStatus::InsufficientPayment, strategy, budget);
            schedule.shortfall = Some(Money::round(shortfall));
            return Ok(schedule);
        }

        let epsilon = self.config.payoff_epsilon;
        let mut working: Vec<WorkingLoan> = ordered.into_iter().map(WorkingLoan::from).collect();
        let mut months = Vec::new();
        let mut outstanding = total_balance(&working);

        debug!(
            "Simulating {} loans with strategy {} and budget {}",
            working.len(),
            strategy,
            monthly_budget
        );

        for month_number in 1..=self.config.max_months {
            match outstanding {
                Some(total) if total > epsilon => {}
                _ => break,
            }

            match simulate_month(&working, month_number, monthly_budget, epsilon) {
                Some(step) => {
                    outstanding = total_balance(&step.balances);
                    working = step.balances;
                    months.push(step.record);
                }
                None => {
                    outstanding = None;
                    break;
                }
            }
        }

        let status = match outstanding {
            Some(total) if total <= epsilon => {
                info!("Debt paid off in {} months", months.len());
                ScheduleStatus::Ok
            }
            Some(total) => {
                warn!(
                    "Debt not paid off after {} months ({} outstanding)",
                    months.len(),
                    Money::round(total)
                );
                ScheduleStatus::DidNotConverge
            }
            None => {
                warn!(
                    "Balances outgrew the decimal range after {} months; stopping",
                    months.len()
                );
                ScheduleStatus::DidNotConverge
            }
        };

        Ok(Schedule {
            status,
            strategy,
            monthly_budget: budget,
            shortfall: None,
            months,
        })
    }

    /// Runs every ranked strategy over the same loans and budget.
    ///
    /// Schedules come back in [`Strategy::RANKED`] order.
    pub fn compare(&self, loans: &[LoanSnapshot], monthly_budget: Decimal) -> Result<Vec<Schedule>> {
        Strategy::RANKED
            .iter()
            .map(|strategy| self.simulate(loans, *strategy, monthly_budget))
            .collect()
    }
}

/// Rejects budgets whose magnitude is beyond [`MAX_AMOUNT`].
fn validate_budget(monthly_budget: Decimal) -> Result<()> {
    if monthly_budget.abs() > MAX_AMOUNT {
        return Err(EngineError::InvalidBudget {
            budget: monthly_budget,
            limit: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Simulates with the default settings.
pub fn simulate(
    loans: &[LoanSnapshot],
    strategy: Strategy,
    monthly_budget: Decimal,
) -> Result<Schedule> {
    PayoffEngine::new().simulate(loans, strategy, monthly_budget)
}

/// Result of advancing the working set by one month.
#[derive(Debug, Clone)]
pub struct MonthStep {
    /// Loan state after the month, in the same order as the input.
    pub balances: Vec<WorkingLoan>,
    pub record: MonthRecord,
}

/// Per-loan accumulator for the month being simulated.
struct LineItem {
    index: usize,
    starting_balance: Decimal,
    interest: Decimal,
    payment: Decimal,
    interest_portion: Decimal,
    principal_portion: Decimal,
}

/// Advances priority-ordered loans by one month.
///
/// The input is left untouched; the new state is returned with the month's
/// record. Callers must have checked that the budget covers the minimums.
///
/// Returns `None` if accrued interest pushes a balance, or the combined
/// balance, past the largest `Decimal`.
pub fn simulate_month(
    loans: &[WorkingLoan],
    month_number: u32,
    monthly_budget: Decimal,
    payoff_epsilon: Decimal,
) -> Option<MonthStep> {
    let mut balances = loans.to_vec();
    let mut remaining_budget = monthly_budget;
    let mut total_payment = Decimal::ZERO;
    let mut lines: Vec<LineItem> = Vec::with_capacity(balances.len());

    // Interest is capitalized before any payment this month.
    for (index, loan) in balances.iter_mut().enumerate() {
        if loan.is_active() {
            let interest = loan.monthly_interest()?;
            loan.balance = loan.balance.checked_add(interest)?;
            lines.push(LineItem {
                index,
                starting_balance: loan.balance,
                interest,
                payment: Decimal::ZERO,
                interest_portion: Decimal::ZERO,
                principal_portion: Decimal::ZERO,
            });
        }
    }

    for line in lines.iter_mut() {
        let loan = &mut balances[line.index];
        if !loan.is_active() {
            continue;
        }

        let payment = loan
            .minimum_payment
            .min(loan.balance)
            .min(remaining_budget);
        loan.balance -= payment;
        remaining_budget -= payment;
        total_payment += payment;

        let interest_portion = payment.min(line.interest);
        line.payment += payment;
        line.interest_portion += interest_portion;
        line.principal_portion += payment - interest_portion;
    }

    if remaining_budget > Decimal::ZERO {
        if let Some(line) = lines
            .iter_mut()
            .find(|line| balances[line.index].is_active())
        {
            let loan = &mut balances[line.index];
            let surplus = remaining_budget.min(loan.balance);
            loan.balance -= surplus;
            total_payment += surplus;

            line.payment += surplus;
            line.principal_portion += surplus;

            debug!(
                "Month {}: surplus {} applied to loan {}",
                month_number, surplus, loan.id
            );
        }
    }

    let loan_breakdown = lines
        .iter()
        .map(|line| {
            let loan = &balances[line.index];
            LoanMonthDetail {
                loan_id: loan.id.clone(),
                name: loan.name.clone(),
                starting_balance: Money::round(line.starting_balance),
                interest_charged: Money::round(line.interest),
                payment: Money::round(line.payment),
                principal_portion: Money::round(line.principal_portion),
                interest_portion: Money::round(line.interest_portion),
                ending_balance: Money::round(loan.balance),
                paid_off: loan.balance <= payoff_epsilon,
            }
        })
        .collect();

    let remaining = total_balance(&balances)?;
    debug!(
        "Month {}: paid {}, remaining debt {}",
        month_number, total_payment, remaining
    );

    Some(MonthStep {
        balances,
        record: MonthRecord {
            month_number,
            total_payment: Money::round(total_payment),
            remaining_debt_total: Money::round(remaining),
            loan_breakdown,
        },
    })
}

/// Combined balance, or `None` on overflow.
fn total_balance(loans: &[WorkingLoan]) -> Option<Decimal> {
    loans
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.balance))
}

/// Figures about a loan set before any simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioOverview {
    pub loan_count: usize,
    pub active_loan_count: usize,
    pub total_debt: Money,
    pub total_minimum_payment: Money,

    /// One year of simple interest on today's balances.
    pub estimated_yearly_interest: Money,

    /// Budget left after minimums; negative when the budget falls short.
    pub surplus: Money,
}

impl PortfolioOverview {
    /// Fails on the same malformed loans and budgets a simulation rejects.
    pub fn new(loans: &[LoanSnapshot], monthly_budget: Decimal) -> Result<Self> {
        validate_loans(loans)?;
        validate_budget(monthly_budget)?;

        let active: Vec<&LoanSnapshot> = loans.iter().filter(|l| l.is_active()).collect();
        let total_debt: Decimal = loans.iter().map(|l| l.balance).sum();
        let total_minimum: Decimal = active.iter().map(|l| l.minimum_payment).sum();
        let yearly_interest: Decimal = loans
            .iter()
            .map(|l| l.balance * l.annual_rate_percent / Decimal::ONE_HUNDRED)
            .sum();

        Ok(PortfolioOverview {
            loan_count: loans.len(),
            active_loan_count: active.len(),
            total_debt: Money::round(total_debt),
            total_minimum_payment: Money::round(total_minimum),
            estimated_yearly_interest: Money::round(yearly_interest),
            surplus: Money::round(monthly_budget - total_minimum),
        })
    }

    /// Returns `true` if the budget covers every active minimum.
    pub fn covers_minimums(&self) -> bool {
        self.surplus >= Money::ZERO
    }
}
