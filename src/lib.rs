//! # Payoff Engine
//!
//! Simulates paying down a set of loans with a fixed monthly budget and
//! produces a month-by-month amortization schedule.
//!
//! ## Design Principles
//!
//! - **Decimal arithmetic**: balances accrue at full `rust_decimal` precision;
//!   recorded figures are rounded to cents once, when a month is written
//! - **Fixed priority**: loans are ordered once per run by the chosen
//!   [`Strategy`]; the whole surplus goes to the first loan still open
//! - **Statuses, not errors**: budget shortfalls, empty loan sets and runs
//!   that hit the month bound are reported through [`ScheduleStatus`]
//! - **Independent runs**: each simulation owns its working copy of the loans
//!
//! ## Example
//!
//! ```
//! use payoff_engine::{simulate, LoanSnapshot, ScheduleStatus, Strategy};
//! use rust_decimal_macros::dec;
//!
//! let loans = vec![LoanSnapshot::new("card", "Credit Card", dec!(1200), dec!(12), dec!(50))];
//! let schedule = simulate(&loans, Strategy::Avalanche, dec!(200)).unwrap();
//!
//! assert_eq!(schedule.status, ScheduleStatus::Ok);
//! assert_eq!(schedule.months[0].remaining_debt_total.to_string(), "1012.00");
//! ```

pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod loan;
pub mod report;
pub mod schedule;
pub mod strategy;

pub use config::SimulationConfig;
pub use decimal::Money;
pub use engine::{simulate, simulate_month, MonthStep, PayoffEngine, PortfolioOverview};
pub use error::{EngineError, Result};
pub use loan::{load_loans, validate_loans, LoanRecord, LoanSnapshot, WorkingLoan};
pub use schedule::{
    LoanMonthDetail, LoanPayoff, MonthRecord, Schedule, ScheduleStatus, ScheduleSummary,
};
pub use strategy::Strategy;
