#![doc(test(attr(deny(warnings))))]

//! Household Core implements the settlement engine behind a shared-expense
//! manager: membership and leave windows, per-expense responsibility,
//! contribution aggregation, debt netting, and the multi-party confirmation
//! lifecycle that decides which expenses count.

pub mod errors;
pub mod household;
pub mod services;
pub mod settlement;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Household Core tracing initialized.");
    });
}
