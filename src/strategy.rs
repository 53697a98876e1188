//! Payoff prioritization strategies.
//!
//! Each strategy is a pure comparator over loan snapshots. Ordering is
//! computed once per simulation run with a stable sort, so loans that tie on
//! the strategy's key keep the caller's relative order.

use crate::loan::LoanSnapshot;
use log::warn;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Rule that decides which loan receives the monthly surplus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Smallest balance first.
    #[default]
    Snowball,

    /// Highest interest rate first.
    Avalanche,

    /// Largest balance first.
    HighestBalance,

    /// Smallest minimum payment first.
    LowestPayment,

    /// Largest minimum payment first.
    HighestPayment,

    /// Caller's input order.
    Custom,
}

impl Strategy {
    /// Every strategy with a sort key, in presentation order.
    pub const RANKED: [Strategy; 5] = [
        Strategy::Snowball,
        Strategy::Avalanche,
        Strategy::HighestBalance,
        Strategy::LowestPayment,
        Strategy::HighestPayment,
    ];

    /// Stable identifier, as accepted by [`Strategy::parse`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Snowball => "snowball",
            Strategy::Avalanche => "avalanche",
            Strategy::HighestBalance => "highest_balance",
            Strategy::LowestPayment => "lowest_payment",
            Strategy::HighestPayment => "highest_payment",
            Strategy::Custom => "custom",
        }
    }

    /// Parses a strategy identifier.
    ///
    /// Matching ignores case, surrounding whitespace and treats `-` like `_`.
    /// Unrecognized identifiers fall back to [`Strategy::Custom`].
    pub fn parse(identifier: &str) -> Strategy {
        let normalized = identifier.trim().to_lowercase().replace('-', "_");

        match normalized.as_str() {
            "snowball" => Strategy::Snowball,
            "avalanche" => Strategy::Avalanche,
            "highest_balance" => Strategy::HighestBalance,
            "lowest_payment" => Strategy::LowestPayment,
            "highest_payment" => Strategy::HighestPayment,
            "custom" | "" => Strategy::Custom,
            _ => {
                warn!(
                    "Unrecognized strategy '{}', keeping input order",
                    identifier
                );
                Strategy::Custom
            }
        }
    }

    /// Compares two loans by this strategy's key.
    ///
    /// Returns `Ordering::Equal` for ties and for [`Strategy::Custom`]; the
    /// caller's stable sort then keeps input order.
    pub fn compare(&self, a: &LoanSnapshot, b: &LoanSnapshot) -> Ordering {
        match self {
            Strategy::Snowball => a.balance.cmp(&b.balance),
            Strategy::Avalanche => b.annual_rate_percent.cmp(&a.annual_rate_percent),
            Strategy::HighestBalance => b.balance.cmp(&a.balance),
            Strategy::LowestPayment => a.minimum_payment.cmp(&b.minimum_payment),
            Strategy::HighestPayment => b.minimum_payment.cmp(&a.minimum_payment),
            Strategy::Custom => Ordering::Equal,
        }
    }

    /// Returns the active loans (balance > 0) in priority order.
    pub fn prioritize<'a>(&self, loans: &'a [LoanSnapshot]) -> Vec<&'a LoanSnapshot> {
        let mut active: Vec<&LoanSnapshot> = loans.iter().filter(|l| l.is_active()).collect();
        // sort_by is stable
        active.sort_by(|a, b| self.compare(a, b));
        active
    }
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Strategy::parse(s))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
