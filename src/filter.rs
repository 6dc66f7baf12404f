// 🔍 Filters - pure selection over a list of transactions
// Used to pick rows to highlight; never removes anything

use crate::config::CategorySet;
use crate::error::Result;
use crate::transaction::{validate_amount, validate_category, Transaction};
use serde::Serialize;
use std::fmt;

// ============================================================================
// AMOUNT FILTER
// ============================================================================

/// Keeps transactions with `amount >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountFilter {
    threshold: f64,
}

impl AmountFilter {
    pub fn new(threshold: f64) -> Result<Self> {
        validate_amount(threshold)?;
        Ok(AmountFilter { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.amount() >= self.threshold
    }
}

// ============================================================================
// CATEGORY FILTER
// ============================================================================

/// Keeps transactions whose category equals `category` exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFilter {
    category: String,
}

impl CategoryFilter {
    pub fn new(category: &str, categories: &CategorySet) -> Result<Self> {
        validate_category(category, categories)?;
        Ok(CategoryFilter {
            category: category.to_string(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.category() == self.category
    }
}

// ============================================================================
// FILTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Filter {
    Amount(AmountFilter),
    Category(CategoryFilter),
}

impl Filter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Filter::Amount(f) => f.matches(tx),
            Filter::Category(f) => f.matches(tx),
        }
    }

    /// Matching transactions, in their original relative order
    pub fn select<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|tx| self.matches(tx)).collect()
    }
}

impl From<AmountFilter> for Filter {
    fn from(filter: AmountFilter) -> Self {
        Filter::Amount(filter)
    }
}

impl From<CategoryFilter> for Filter {
    fn from(filter: CategoryFilter) -> Self {
        Filter::Category(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Amount(a) => write!(f, "amount >= {:.2}", a.threshold),
            Filter::Category(c) => write!(f, "category = {}", c.category),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpenseError;
    use crate::transaction::FixedClock;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Transaction> {
        let categories = CategorySet::with_defaults();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());

        [(50.0, "food"), (120.0, "travel"), (100.0, "food")]
            .iter()
            .map(|(amount, category)| {
                Transaction::create_with_clock(*amount, category, &categories, &clock).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_amount_filter_inclusive() {
        let transactions = sample();
        let filter = Filter::from(AmountFilter::new(100.0).unwrap());

        let selected = filter.select(&transactions);
        let amounts: Vec<f64> = selected.iter().map(|tx| tx.amount()).collect();

        // 100 is kept, 120 as well
        assert_eq!(amounts, vec![120.0, 100.0]);
    }

    #[test]
    fn test_amount_filter_above_all_but_one() {
        let transactions = sample();
        let filter = Filter::from(AmountFilter::new(101.0).unwrap());

        let selected = filter.select(&transactions);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].category(), "travel");
    }

    #[test]
    fn test_category_filter() {
        let transactions = sample();
        let categories = CategorySet::with_defaults();
        let filter = Filter::from(CategoryFilter::new("travel", &categories).unwrap());

        let selected = filter.select(&transactions);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].amount(), 120.0);
        assert_eq!(selected[0].category(), "travel");
    }

    #[test]
    fn test_category_filter_preserves_order() {
        let transactions = sample();
        let categories = CategorySet::with_defaults();
        let filter = Filter::from(CategoryFilter::new("food", &categories).unwrap());

        let amounts: Vec<f64> = filter.select(&transactions).iter().map(|tx| tx.amount()).collect();
        assert_eq!(amounts, vec![50.0, 100.0]);
    }

    #[test]
    fn test_select_empty_and_no_match() {
        let categories = CategorySet::with_defaults();
        let filter = Filter::from(CategoryFilter::new("bills", &categories).unwrap());

        assert!(filter.select(&[]).is_empty());
        assert!(filter.select(&sample()).is_empty());
    }

    #[test]
    fn test_select_does_not_touch_input() {
        let transactions = sample();
        let before = transactions.clone();
        let _ = Filter::from(AmountFilter::new(60.0).unwrap()).select(&transactions);
        assert_eq!(transactions, before);
    }

    #[test]
    fn test_invalid_construction() {
        let categories = CategorySet::with_defaults();

        assert_eq!(AmountFilter::new(0.0), Err(ExpenseError::InvalidAmount(0.0)));
        assert!(AmountFilter::new(-1.0).is_err());
        assert!(AmountFilter::new(f64::NAN).is_err());
        assert!(CategoryFilter::new("", &categories).is_err());
        assert_eq!(
            CategoryFilter::new("Travel", &categories),
            Err(ExpenseError::InvalidCategory("Travel".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let categories = CategorySet::with_defaults();
        assert_eq!(
            Filter::from(AmountFilter::new(100.0).unwrap()).to_string(),
            "amount >= 100.00"
        );
        assert_eq!(
            Filter::from(CategoryFilter::new("food", &categories).unwrap()).to_string(),
            "category = food"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Filter::from(AmountFilter::new(25.0).unwrap())).unwrap();
        assert_eq!(json["kind"], "amount");
        assert_eq!(json["threshold"], 25.0);
    }
}
