#![doc(test(attr(deny(warnings))))]

//! Dues Core tracks recurring dues owed by association members and validates payments
//! against them before they reach a payment ledger.

pub mod config;
pub mod core;
pub mod dues;
pub mod errors;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

pub use crate::core::{DueOracle, PaymentLedger, PaymentManager};
pub use dues::{DueSchedule, DueSummaryEntry, Month, Payment, UnitIdentity};
pub use errors::{DuesError, Result};
pub use storage::MemoryLedger;
pub use time::{Clock, FixedClock, SystemClock};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Dues Core tracing initialized.");
    });
}
