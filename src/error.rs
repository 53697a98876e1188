//! Error types for the payoff engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while loading loans or running a simulation.
///
/// Budget shortfalls and empty loan sets are not errors; they are reported
/// through [`crate::ScheduleStatus`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A loan snapshot violates an input invariant
    #[error("Invalid loan '{id}': {message}")]
    InvalidLoan { id: String, message: String },

    /// Two snapshots share an id
    #[error("Duplicate loan ID '{id}'")]
    DuplicateLoanId { id: String },

    /// A CSV row could not be turned into a loan snapshot
    #[error("Invalid loan record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// The monthly budget is outside the accepted range
    #[error("Invalid monthly budget {budget}: magnitude must be at most {limit}")]
    InvalidBudget {
        budget: rust_decimal::Decimal,
        limit: rust_decimal::Decimal,
    },

    /// Simulation settings are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
