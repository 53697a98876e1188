//! Loan models: input snapshots, CSV records and working simulation state.

use crate::config::{MAX_AMOUNT, MAX_ANNUAL_RATE_PERCENT};
use crate::error::{EngineError, Result};
use csv::{ReaderBuilder, Trim};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

/// An immutable view of one loan as supplied by the caller.
///
/// # Invariants
///
/// - `balance`, `annual_rate_percent` and `minimum_payment` are non-negative
/// - `balance` and `minimum_payment` are at most [`MAX_AMOUNT`]; the rate is
///   at most [`MAX_ANNUAL_RATE_PERCENT`]
/// - `id` is non-empty and unique within a loan set
///
/// A snapshot with a zero balance is already paid off and takes no part in a
/// simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSnapshot {
    /// Opaque identifier, unique within the set.
    pub id: String,

    /// Display label. Not used in computation.
    pub name: String,

    /// Outstanding balance in currency units.
    pub balance: Decimal,

    /// Nominal yearly rate, e.g. `19.99` for 19.99%.
    pub annual_rate_percent: Decimal,

    /// Contractual minimum monthly payment.
    pub minimum_payment: Decimal,
}

impl LoanSnapshot {
    /// Creates a snapshot from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        balance: Decimal,
        annual_rate_percent: Decimal,
        minimum_payment: Decimal,
    ) -> Self {
        LoanSnapshot {
            id: id.into(),
            name: name.into(),
            balance,
            annual_rate_percent,
            minimum_payment,
        }
    }

    /// Returns `true` if the loan still carries a balance.
    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Checks the snapshot's own invariants.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| EngineError::InvalidLoan {
            id: self.id.clone(),
            message: message.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.balance < Decimal::ZERO {
            return Err(invalid("balance must not be negative"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(invalid("annual rate must not be negative"));
        }
        if self.minimum_payment < Decimal::ZERO {
            return Err(invalid("minimum payment must not be negative"));
        }
        if self.balance > MAX_AMOUNT {
            return Err(invalid(&format!("balance must be at most {}", MAX_AMOUNT)));
        }
        if self.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
            return Err(invalid(&format!(
                "annual rate must be at most {}%",
                MAX_ANNUAL_RATE_PERCENT
            )));
        }
        if self.minimum_payment > MAX_AMOUNT {
            return Err(invalid(&format!(
                "minimum payment must be at most {}",
                MAX_AMOUNT
            )));
        }
        Ok(())
    }
}

/// Validates every snapshot and rejects repeated ids.
pub fn validate_loans(loans: &[LoanSnapshot]) -> Result<()> {
    let mut seen = HashSet::with_capacity(loans.len());
    for loan in loans {
        loan.validate()?;
        if !seen.insert(loan.id.as_str()) {
            return Err(EngineError::DuplicateLoanId {
                id: loan.id.clone(),
            });
        }
    }
    Ok(())
}

/// Raw loan row as read from CSV.
///
/// Numeric columns are kept as strings so a bad value can be reported with
/// its row number instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoanRecord {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub balance: String,

    pub annual_rate_percent: String,

    pub minimum_payment: String,
}

impl LoanRecord {
    /// Parses the raw record into a validated snapshot.
    pub fn parse(&self, row: usize) -> Result<LoanSnapshot> {
        let snapshot = LoanSnapshot {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            balance: parse_decimal("balance", &self.balance, row)?,
            annual_rate_percent: parse_decimal(
                "annual_rate_percent",
                &self.annual_rate_percent,
                row,
            )?,
            minimum_payment: parse_decimal("minimum_payment", &self.minimum_payment, row)?,
        };

        snapshot
            .validate()
            .map_err(|e| EngineError::InvalidRecord {
                row,
                message: e.to_string(),
            })?;

        Ok(snapshot)
    }
}

fn parse_decimal(field: &str, raw: &str, row: usize) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRecord {
            row,
            message: format!("missing {}", field),
        });
    }
    Decimal::from_str(trimmed).map_err(|e| EngineError::InvalidRecord {
        row,
        message: format!("{} '{}' is not a number: {}", field, trimmed, e),
    })
}

/// Reads an ordered loan set from CSV.
///
/// The header row is required. Any malformed row, negative figure or
/// repeated id aborts the load with an error naming the row.
pub fn load_loans<R: Read>(reader: R) -> Result<Vec<LoanSnapshot>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut loans = Vec::new();
    let mut seen = HashSet::new();

    for (row_idx, result) in csv_reader.deserialize::<LoanRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = result.map_err(|e| EngineError::InvalidRecord {
            row: row_num,
            message: e.to_string(),
        })?;
        let loan = record.parse(row_num)?;

        if !seen.insert(loan.id.clone()) {
            return Err(EngineError::InvalidRecord {
                row: row_num,
                message: format!("duplicate loan ID '{}'", loan.id),
            });
        }

        debug!(
            "Row {}: loaded loan {} (balance {}, rate {}%, minimum {})",
            row_num, loan.id, loan.balance, loan.annual_rate_percent, loan.minimum_payment
        );
        loans.push(loan);
    }

    Ok(loans)
}

/// Per-run mutable copy of a loan's numeric state.
///
/// Owned by exactly one simulation run and discarded when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingLoan {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
    pub annual_rate_percent: Decimal,
    pub minimum_payment: Decimal,
}

impl WorkingLoan {
    /// Interest accrued on the current balance over one month.
    ///
    /// Returns `None` if the balance has grown past what `Decimal` can hold.
    pub fn monthly_interest(&self) -> Option<Decimal> {
        self.balance
            .checked_mul(self.annual_rate_percent / Decimal::ONE_HUNDRED)?
            .checked_div(Decimal::from(12))
    }

    /// Returns `true` while any balance is outstanding.
    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }
}

impl From<&LoanSnapshot> for WorkingLoan {
    fn from(snapshot: &LoanSnapshot) -> Self {
        WorkingLoan {
            id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            balance: snapshot.balance,
            annual_rate_percent: snapshot.annual_rate_percent,
            minimum_payment: snapshot.minimum_payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn record(id: &str, balance: &str, rate: &str, min: &str) -> LoanRecord {
        LoanRecord {
            id: id.to_string(),
            name: "Card".to_string(),
            balance: balance.to_string(),
            annual_rate_percent: rate.to_string(),
            minimum_payment: min.to_string(),
        }
    }

    #[test]
    fn test_parse_record() {
        let loan = record(" card ", "1200.50", "19.99", "35").parse(2).unwrap();
        assert_eq!(loan.id, "card");
        assert_eq!(loan.balance, dec!(1200.50));
        assert_eq!(loan.annual_rate_percent, dec!(19.99));
        assert_eq!(loan.minimum_payment, dec!(35));
    }

    #[test]
    fn test_parse_rejects_non_numeric_balance() {
        let err = record("card", "lots", "10", "35").parse(3).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { row: 3, .. }));
    }

    #[test]
    fn test_parse_rejects_negative_rate() {
        let err = record("card", "100", "-1", "35").parse(4).unwrap_err();
        match err {
            EngineError::InvalidRecord { row, message } => {
                assert_eq!(row, 4);
                assert!(message.contains("rate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_negative_balance() {
        let loan = LoanSnapshot::new("a", "A", dec!(-5), dec!(1), dec!(1));
        assert!(matches!(
            loan.validate(),
            Err(EngineError::InvalidLoan { .. })
        ));
    }

    #[test]
    fn test_validate_loans_rejects_duplicates() {
        let loans = vec![
            LoanSnapshot::new("a", "A", dec!(5), dec!(1), dec!(1)),
            LoanSnapshot::new("a", "Again", dec!(6), dec!(1), dec!(1)),
        ];
        match validate_loans(&loans) {
            Err(EngineError::DuplicateLoanId { id }) => assert_eq!(id, "a"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_balance_is_inactive() {
        let loan = LoanSnapshot::new("a", "A", dec!(0), dec!(1), dec!(1));
        assert!(!loan.is_active());
        assert!(loan.validate().is_ok());
    }

    #[test]
    fn test_load_loans_preserves_order() {
        let csv = "id, name, balance, annual_rate_percent, minimum_payment
car, Car Loan, 8000, 6.5, 250
card, Credit Card, 1200, 19.99, 35";

        let loans = load_loans(Cursor::new(csv)).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].id, "car");
        assert_eq!(loans[1].name, "Credit Card");
    }

    #[test]
    fn test_load_loans_reports_duplicate_row() {
        let csv = "id,name,balance,annual_rate_percent,minimum_payment
a,A,100,5,10
a,B,200,5,10";

        let err = load_loans(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { row: 3, .. }));
    }

    #[test]
    fn test_monthly_interest() {
        let loan = WorkingLoan::from(&LoanSnapshot::new(
            "a",
            "A",
            dec!(1200),
            dec!(12),
            dec!(50),
        ));
        assert_eq!(loan.monthly_interest(), Some(dec!(12)));
    }

    #[test]
    fn test_monthly_interest_overflow_is_none() {
        let mut loan = WorkingLoan::from(&LoanSnapshot::new("a", "A", dec!(1), dec!(1000), dec!(0)));
        loan.balance = Decimal::MAX;
        assert_eq!(loan.monthly_interest(), None);
    }

    #[test]
    fn test_validate_rejects_out_of_range_figures() {
        let huge_balance = LoanSnapshot::new("a", "A", MAX_AMOUNT + dec!(1), dec!(5), dec!(10));
        let huge_rate = LoanSnapshot::new("b", "B", dec!(100), dec!(1000.01), dec!(10));
        let huge_minimum = LoanSnapshot::new("c", "C", dec!(100), dec!(5), MAX_AMOUNT + dec!(1));

        for loan in [huge_balance, huge_rate, huge_minimum] {
            assert!(matches!(
                loan.validate(),
                Err(EngineError::InvalidLoan { .. })
            ));
        }

        let at_limit = LoanSnapshot::new("d", "D", MAX_AMOUNT, MAX_ANNUAL_RATE_PERCENT, MAX_AMOUNT);
        assert!(at_limit.validate().is_ok());
    }
}
