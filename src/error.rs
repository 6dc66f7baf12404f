// ⚠️ Error taxonomy for the expense tracker core
// Every failure here is recoverable and meant to be relayed to the user

use thiserror::Error;

/// Errors produced by transaction/filter construction and row addressing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseError {
    /// Amount was zero, negative, NaN or infinite.
    #[error("invalid amount {0}: must be a positive, finite number")]
    InvalidAmount(f64),

    /// Category was empty or not part of the recognized set.
    #[error("invalid category \"{0}\": not a recognized category")]
    InvalidCategory(String),

    /// A delete or highlight target does not exist in the current table.
    #[error("row {index} is out of range (valid rows: 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ExpenseError {
    /// Short message suitable for a dialog or status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExpenseError::InvalidAmount(_) | ExpenseError::InvalidCategory(_) => {
                "Invalid amount or category entered"
            }
            ExpenseError::IndexOutOfRange { .. } => "There's no such transaction in the table!",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

// ============================================================================
// TESTS
// ============================================================================
