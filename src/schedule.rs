//! Schedule output types and the figures derived from them.

use crate::decimal::Money;
use crate::strategy::Strategy;
use serde::Serialize;

/// Outcome of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Every loan was paid off within the month bound.
    Ok,

    /// The budget is zero, negative, or below the combined minimum payments.
    InsufficientPayment,

    /// No loan carries a balance.
    NoActiveLoans,

    /// The month bound was reached with debt still outstanding.
    DidNotConverge,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Ok => "ok",
            ScheduleStatus::InsufficientPayment => "insufficient_payment",
            ScheduleStatus::NoActiveLoans => "no_active_loans",
            ScheduleStatus::DidNotConverge => "did_not_converge",
        }
    }
}

/// One loan's activity within one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanMonthDetail {
    pub loan_id: String,
    pub name: String,

    /// Balance after this month's interest was added.
    pub starting_balance: Money,
    pub interest_charged: Money,

    /// Minimum plus any surplus paid this month.
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,

    /// Ending balance is within the payoff epsilon.
    pub paid_off: bool,
}

/// The complete account of one simulated month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRecord {
    /// 1-based month index.
    pub month_number: u32,
    pub total_payment: Money,

    /// Sum of all balances after this month's payments.
    pub remaining_debt_total: Money,

    /// Loans that were active this month, in priority order.
    pub loan_breakdown: Vec<LoanMonthDetail>,
}

impl MonthRecord {
    /// Looks up one loan's detail by id.
    pub fn detail(&self, loan_id: &str) -> Option<&LoanMonthDetail> {
        self.loan_breakdown.iter().find(|d| d.loan_id == loan_id)
    }
}

/// A month-by-month payoff plan.
///
/// `months` is in chronological order. It is empty unless `status` is
/// [`ScheduleStatus::Ok`] or [`ScheduleStatus::DidNotConverge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub status: ScheduleStatus,
    pub strategy: Strategy,
    pub monthly_budget: Money,

    /// Amount the budget falls short of the combined minimums.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<Money>,

    pub months: Vec<MonthRecord>,
}

impl Schedule {
    pub(crate) fn empty(status: ScheduleStatus, strategy: Strategy, monthly_budget: Money) -> Self {
        Schedule {
            status,
            strategy,
            monthly_budget,
            shortfall: None,
            months: Vec::new(),
        }
    }

    /// Returns `true` if the schedule ends with every loan paid off.
    pub fn is_paid_off(&self) -> bool {
        self.status == ScheduleStatus::Ok
    }

    /// Derives headline figures for this schedule.
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_schedule(self)
    }
}

/// Month in which one loan was first reported paid off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanPayoff {
    pub loan_id: String,
    pub name: String,
    pub payoff_month: Option<u32>,
}

/// Headline figures of a finished schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub strategy: Strategy,
    pub status: ScheduleStatus,

    /// Months until debt-free; `None` unless every loan was paid off.
    pub months_to_payoff: Option<u32>,
    pub months_simulated: u32,
    pub total_paid: Money,
    pub total_interest: Money,

    /// Debt outstanding after the last simulated month.
    pub final_debt: Money,
    pub shortfall: Option<Money>,

    /// Loans in the order they first appear in the schedule.
    pub payoffs: Vec<LoanPayoff>,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let total_paid: Money = schedule.months.iter().map(|m| m.total_payment).sum();
        let total_interest: Money = schedule
            .months
            .iter()
            .flat_map(|m| m.loan_breakdown.iter())
            .map(|d| d.interest_charged)
            .sum();
        let final_debt = schedule
            .months
            .last()
            .map(|m| m.remaining_debt_total)
            .unwrap_or(Money::ZERO);

        let mut payoffs: Vec<LoanPayoff> = Vec::new();
        for month in &schedule.months {
            for detail in &month.loan_breakdown {
                let idx = match payoffs.iter().position(|p| p.loan_id == detail.loan_id) {
                    Some(idx) => idx,
                    None => {
                        payoffs.push(LoanPayoff {
                            loan_id: detail.loan_id.clone(),
                            name: detail.name.clone(),
                            payoff_month: None,
                        });
                        payoffs.len() - 1
                    }
                };
                let entry = &mut payoffs[idx];
                if entry.payoff_month.is_none() && detail.paid_off {
                    entry.payoff_month = Some(month.month_number);
                }
            }
        }

        let months_to_payoff = if schedule.is_paid_off() {
            schedule.months.last().map(|m| m.month_number)
        } else {
            None
        };

        ScheduleSummary {
            strategy: schedule.strategy,
            status: schedule.status,
            months_to_payoff,
            months_simulated: schedule.months.len() as u32,
            total_paid,
            total_interest,
            final_debt,
            shortfall: schedule.shortfall,
            payoffs,
        }
    }

    /// Payoff month of one loan, if it was paid off.
    pub fn payoff_month(&self, loan_id: &str) -> Option<u32> {
        self.payoffs
            .iter()
            .find(|p| p.loan_id == loan_id)
            .and_then(|p| p.payoff_month)
    }
}
