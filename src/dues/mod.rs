//! Due periods, payments, and the month arithmetic behind them.

pub mod month;
pub mod payment;
pub mod schedule;

pub use month::{month_range, Month, MonthRange};
pub use payment::{checked_sum, total, DueSummaryEntry, Payment, UnitIdentity};
pub use schedule::DueSchedule;
