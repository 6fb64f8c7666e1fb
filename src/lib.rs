#![doc(test(attr(deny(warnings))))]

//! Flight Ledger plans media-advertising budgets as month-sized flights inside
//! a campaign and keeps budget, impression, view and traffic figures consistent
//! while the plan is edited, split, locked and rebalanced.

pub mod calc;
pub mod config;
pub mod core;
pub mod dates;
pub mod errors;
pub mod ledger;
pub mod tactics;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Flight ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
