// Expense Tracker - Core Library
// Transaction store, filters, table projection and the controller that ties
// them together. Rendering is left to the host (see the `expense-tracker` binary).

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod projection;
pub mod store;
pub mod transaction;

// Re-export commonly used types
pub use config::{CategorySet, Config, DEFAULT_CATEGORIES, DEFAULT_DATE_FORMAT};
pub use controller::Controller;
pub use error::{ExpenseError, Result};
pub use filter::{AmountFilter, CategoryFilter, Filter};
pub use projection::{TableProjection, TableRow};
pub use store::{ObserverId, StoreObserver, TransactionStore};
pub use transaction::{Clock, FixedClock, SystemClock, Transaction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
