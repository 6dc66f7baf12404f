// 🗄️ Transaction Store - the authoritative, ordered list of transactions
// Observers are notified synchronously, in subscription order, after every
// successful mutation

use crate::transaction::Transaction;
use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// OBSERVERS
// ============================================================================

/// Receives the full, already-committed transaction list after each mutation.
pub trait StoreObserver {
    fn on_store_changed(&mut self, transactions: &[Transaction]) -> anyhow::Result<()>;
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

// ============================================================================
// STORE
// ============================================================================

#[derive(Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    observers: Vec<(ObserverId, Rc<RefCell<dyn StoreObserver>>)>,
    next_observer_id: u64,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and notify
    pub fn add(&mut self, transaction: Transaction) {
        tracing::debug!(
            amount = transaction.amount(),
            category = transaction.category(),
            "Adding transaction"
        );
        self.transactions.push(transaction);
        self.notify();
    }

    /// Remove the first structurally-equal transaction, if any
    pub fn remove(&mut self, transaction: &Transaction) -> bool {
        match self.transactions.iter().position(|tx| tx == transaction) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    /// Remove by position; out of range is a silent `false`
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.transactions.len() {
            return false;
        }

        let removed = self.transactions.remove(index);
        tracing::debug!(
            index,
            amount = removed.amount(),
            category = removed.category(),
            "Removed transaction"
        );
        self.notify();
        true
    }

    /// Owned snapshot; later mutations don't affect it
    pub fn list(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of all amounts
    pub fn total(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.amount()).sum()
    }

    pub fn subscribe(&mut self, observer: Rc<RefCell<dyn StoreObserver>>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Fan out to every observer. A failing or re-entrant observer is logged
    /// and skipped; the mutation that triggered this is already committed.
    fn notify(&self) -> usize {
        let mut failures = 0;

        for (id, observer) in &self.observers {
            let result = match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_store_changed(&self.transactions),
                Err(_) => Err(anyhow::anyhow!("observer is already being notified")),
            };

            if let Err(err) = result {
                failures += 1;
                tracing::error!(observer = id.0, error = %err, "Store observer failed");
            }
        }

        if failures > 0 {
            tracing::warn!(failures, "Some store observers were not updated");
        }

        failures
    }
}

// ============================================================================
// TESTS
// ============================================================================
