#![doc(test(attr(deny(warnings))))]

//! Finwell Core tracks a learner's credit accounts and debts, estimates a
//! synthetic credit score, projects debt payoff, and keeps everything in a
//! key-value store through a debounced autosave.

pub mod activity;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod estimator;
pub mod ledger;
pub mod persistence;
pub mod profile;
pub mod utils;

pub use crate::core::FinanceTracker;
pub use errors::{FinanceError, FinanceResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finwell Core tracing initialized.");
    });
}
