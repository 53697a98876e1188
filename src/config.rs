//! Simulation settings.

use crate::error::{EngineError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default bound on simulated months (50 years).
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// Largest month bound a run accepts (500 years).
pub const MAX_MONTHS_LIMIT: u32 = 6000;

/// Default balance at or below which a loan counts as paid off.
pub const DEFAULT_PAYOFF_EPSILON: Decimal = dec!(0.01);

/// Largest balance, minimum payment or monthly budget accepted as input.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000);

/// Largest nominal yearly rate accepted as input, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(1000);

/// Tunables for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Hard bound on the number of simulated months.
    pub max_months: u32,

    /// Balances at or below this amount are treated as paid off.
    pub payoff_epsilon: Decimal,
}

impl SimulationConfig {
    /// Overrides the month bound.
    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }

    /// Checks that the settings can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.max_months == 0 {
            return Err(EngineError::InvalidConfig(
                "max_months must be at least 1".to_string(),
            ));
        }
        if self.max_months > MAX_MONTHS_LIMIT {
            return Err(EngineError::InvalidConfig(format!(
                "max_months must be at most {}, got {}",
                MAX_MONTHS_LIMIT, self.max_months
            )));
        }
        if self.payoff_epsilon < Decimal::ZERO {
            return Err(EngineError::InvalidConfig(format!(
                "payoff_epsilon must not be negative, got {}",
                self.payoff_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_months: DEFAULT_MAX_MONTHS,
            payoff_epsilon: DEFAULT_PAYOFF_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.max_months, 600);
        assert_eq!(config.payoff_epsilon, dec!(0.01));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_months_rejected() {
        let config = SimulationConfig::default().with_max_months(0);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_month_bound_above_limit_rejected() {
        assert!(SimulationConfig::default()
            .with_max_months(MAX_MONTHS_LIMIT)
            .validate()
            .is_ok());

        let config = SimulationConfig::default().with_max_months(u32::MAX);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_negative_epsilon_rejected() {
        let config = SimulationConfig {
            payoff_epsilon: dec!(-0.5),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
