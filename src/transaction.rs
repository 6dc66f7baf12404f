// 💸 Transaction - a single recorded expense
// Validated at construction, read-only afterwards

use crate::config::CategorySet;
use crate::error::{ExpenseError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// TIMESTAMP SOURCE
// ============================================================================

/// Source of the "current instant" stamped on new transactions.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Equality is structural: same amount, category and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    amount: f64,
    category: String,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Validate and stamp with the current system time
    pub fn create(amount: f64, category: &str, categories: &CategorySet) -> Result<Self> {
        Self::create_with_clock(amount, category, categories, &SystemClock)
    }

    /// Validate and stamp with `clock.now()`; the clock is only read on success
    pub fn create_with_clock(
        amount: f64,
        category: &str,
        categories: &CategorySet,
        clock: &dyn Clock,
    ) -> Result<Self> {
        validate_amount(amount)?;
        validate_category(category, categories)?;

        Ok(Transaction {
            amount,
            category: category.to_string(),
            timestamp: clock.now(),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(amount))
    }
}

pub(crate) fn validate_category(category: &str, categories: &CategorySet) -> Result<()> {
    if !category.is_empty() && categories.contains(category) {
        Ok(())
    } else {
        Err(ExpenseError::InvalidCategory(category.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
