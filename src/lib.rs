#![doc(test(attr(deny(warnings))))]

//! Expense Core tracks one-time and long-term expenses, derives amortized
//! monthly payments, and buckets spending by calendar month for charting.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
