//! In-memory collections of credit accounts and debts, plus their aggregates.

pub mod credit_store;
pub mod debt_ledger;

pub use credit_store::{CreditAccountStore, CreditStats};
pub use debt_ledger::{DebtLedger, DebtStats, PayoffStrategy};
