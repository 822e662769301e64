pub mod payment_manager;

pub use payment_manager::{DueOracle, PaymentLedger, PaymentManager};
