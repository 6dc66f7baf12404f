// 🎛️ Controller - turns user input into store mutations and highlights
//
// Owns the whole session: the store, the projection subscribed to it, the
// recognized categories, the clock and the active filter. There is no global
// instance; the entry point creates one and keeps it.

use crate::config::{CategorySet, Config};
use crate::error::{ExpenseError, Result};
use crate::filter::{AmountFilter, CategoryFilter, Filter};
use crate::projection::TableProjection;
use crate::store::TransactionStore;
use crate::transaction::{Clock, SystemClock, Transaction};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub struct Controller {
    store: TransactionStore,
    projection: Rc<RefCell<TableProjection>>,
    categories: CategorySet,
    clock: Box<dyn Clock>,
    filter: Option<Filter>,
}

impl Controller {
    pub fn new(mut store: TransactionStore, categories: CategorySet, clock: Box<dyn Clock>) -> Self {
        let projection = TableProjection::attach(&mut store);

        Controller {
            store,
            projection,
            categories,
            clock,
            filter: None,
        }
    }

    /// Fresh, empty session using the system clock
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            TransactionStore::new(),
            config.category_set()?,
            Box::new(SystemClock),
        ))
    }

    // ------------------------------------------------------------------------
    // Add / delete
    // ------------------------------------------------------------------------

    /// `false` means nothing changed; the caller reports the error
    pub fn add_transaction(&mut self, amount: f64, category: &str) -> bool {
        self.try_add_transaction(amount, category).is_ok()
    }

    pub fn try_add_transaction(&mut self, amount: f64, category: &str) -> Result<()> {
        let transaction =
            match Transaction::create_with_clock(amount, category, &self.categories, self.clock.as_ref()) {
                Ok(transaction) => transaction,
                Err(err) => {
                    tracing::warn!(amount, category, error = %err, "Rejected transaction");
                    return Err(err);
                }
            };

        self.store.add(transaction);
        tracing::info!(amount, category, count = self.store.len(), "Added transaction");
        Ok(())
    }

    /// Delete by table row; the total row and anything past it are rejected
    pub fn delete_transaction(&mut self, row_index: usize) -> bool {
        self.try_delete_transaction(row_index).is_ok()
    }

    pub fn try_delete_transaction(&mut self, row_index: usize) -> Result<()> {
        let (position, len) = {
            let projection = self.projection.borrow();
            (projection.transaction_index(row_index), projection.transaction_row_count())
        };

        let removed = position.is_some_and(|position| self.store.remove_at(position));
        if !removed {
            tracing::warn!(row_index, rows = len, "Rejected delete");
            return Err(ExpenseError::IndexOutOfRange { index: row_index, len });
        }

        tracing::info!(row_index, count = self.store.len(), "Deleted transaction");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    pub fn amount_filter(&self, threshold: f64) -> Result<Filter> {
        AmountFilter::new(threshold).map(Filter::from)
    }

    pub fn category_filter(&self, category: &str) -> Result<Filter> {
        CategoryFilter::new(category, &self.categories).map(Filter::from)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        tracing::debug!(filter = %filter, "Filter selected");
        self.filter = Some(filter);
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Highlight rows matching the active filter. `None` if no filter is set.
    pub fn apply_filter(&mut self) -> Option<Vec<usize>> {
        let filter = self.filter.as_ref()?;
        let transactions = self.store.as_slice();

        // select() keeps store order, so one pass pairs each pick with its row
        let mut selected = filter.select(transactions).into_iter().peekable();
        let rows: Vec<usize> = transactions
            .iter()
            .enumerate()
            .filter_map(|(position, tx)| match selected.peek() {
                Some(picked) if std::ptr::eq(*picked, tx) => {
                    selected.next();
                    Some(position)
                }
                _ => None,
            })
            .collect();

        // Rows and store positions line up, so this can't go out of range
        if let Err(err) = self.projection.borrow_mut().apply_highlight(rows.iter().copied()) {
            tracing::error!(error = %err, "Projection out of sync with store");
            return Some(Vec::new());
        }

        tracing::info!(filter = %filter, matched = rows.len(), "Applied filter");
        Some(rows)
    }

    /// Drop the active filter and its highlight
    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.projection.borrow_mut().clear_highlight();
    }

    // ------------------------------------------------------------------------
    // Read access for the presentation layer
    // ------------------------------------------------------------------------

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn projection(&self) -> Ref<'_, TableProjection> {
        self.projection.borrow()
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }
}

// ============================================================================
// TESTS
// ============================================================================
