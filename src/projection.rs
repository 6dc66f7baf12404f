// 📊 Table Projection - row view of the store plus a trailing total row
//
// Rows are derived, never set from outside. Every store notification
// rebuilds them in full and drops any highlight:
//
//   row_count == transactions + (1 if transactions > 0 else 0)

use crate::error::{ExpenseError, Result};
use crate::store::{StoreObserver, TransactionStore};
use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TableRow {
    /// One stored transaction; `number` is the 1-based serial shown to users
    Transaction {
        number: usize,
        amount: f64,
        category: String,
        timestamp: DateTime<Utc>,
    },
    /// Sum of every transaction amount
    Total { amount: f64 },
}

impl TableRow {
    pub fn amount(&self) -> f64 {
        match self {
            TableRow::Transaction { amount, .. } | TableRow::Total { amount } => *amount,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, TableRow::Total { .. })
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

#[derive(Debug, Default)]
pub struct TableProjection {
    rows: Vec<TableRow>,
    highlighted: BTreeSet<usize>,
    total: f64,
}

impl TableProjection {
    /// Build from the store's current contents and subscribe to it
    pub fn attach(store: &mut TransactionStore) -> Rc<RefCell<TableProjection>> {
        let mut projection = TableProjection::default();
        projection.rebuild(store.as_slice());

        let projection = Rc::new(RefCell::new(projection));
        store.subscribe(projection.clone());
        projection
    }

    fn rebuild(&mut self, transactions: &[Transaction]) {
        self.rows.clear();
        self.highlighted.clear();
        self.total = 0.0;

        for (position, tx) in transactions.iter().enumerate() {
            self.total += tx.amount();
            self.rows.push(TableRow::Transaction {
                number: position + 1,
                amount: tx.amount(),
                category: tx.category().to_string(),
                timestamp: tx.timestamp(),
            });
        }

        if !transactions.is_empty() {
            self.rows.push(TableRow::Total { amount: self.total });
        }

        tracing::debug!(rows = self.rows.len(), total = self.total, "Rebuilt table projection");
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    /// All rows, the total row included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows backed by a transaction (excludes the total row)
    pub fn transaction_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Store position behind a row; `None` for the total row
    pub fn transaction_index(&self, row: usize) -> Option<usize> {
        if row < self.transaction_row_count() {
            Some(row)
        } else {
            None
        }
    }

    /// Mark rows as matched. Every index must be a transaction row; on any
    /// bad index nothing changes.
    pub fn apply_highlight<I>(&mut self, indices: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let len = self.transaction_row_count();
        let indices: BTreeSet<usize> = indices.into_iter().collect();

        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(ExpenseError::IndexOutOfRange { index, len });
        }

        self.highlighted = indices;
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    pub fn is_highlighted(&self, row: usize) -> bool {
        self.highlighted.contains(&row)
    }

    pub fn highlighted_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlighted.iter().copied()
    }
}

impl StoreObserver for TableProjection {
    fn on_store_changed(&mut self, transactions: &[Transaction]) -> anyhow::Result<()> {
        self.rebuild(transactions);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
