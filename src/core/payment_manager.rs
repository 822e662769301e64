use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::dues::{month_range, total, DueSummaryEntry, Month, Payment};
use crate::errors::{DuesError, Result};
use crate::time::{Clock, SystemClock};

/// Source of truth for what is owed and since when.
pub trait DueOracle: Send + Sync {
    /// Total due for the inclusive range `from..=to`.
    fn amount_owed(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal>;
    /// Earliest date from which dues accrue.
    fn initial_tracking_date(&self) -> Result<NaiveDate>;
}

/// Record of settled periods per user.
///
/// The manager performs no locking of its own. Implementations that can be reached by
/// concurrent callers must make `record` a check-and-set against `is_paid`, and a caller
/// must observe its own writes through `is_paid`.
pub trait PaymentLedger: Send + Sync {
    type User: ?Sized;

    /// Whether the exact range `from..=to` is fully settled for `user`.
    fn is_paid(&self, user: &Self::User, from: NaiveDate, to: NaiveDate) -> Result<bool>;
    /// Marks `payment` as applied for `user`.
    fn record(&self, payment: &Payment, user: &Self::User) -> Result<()>;
}

impl<T: DueOracle + ?Sized> DueOracle for &T {
    fn amount_owed(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
        (**self).amount_owed(from, to)
    }

    fn initial_tracking_date(&self) -> Result<NaiveDate> {
        (**self).initial_tracking_date()
    }
}

impl<T: DueOracle + ?Sized> DueOracle for Arc<T> {
    fn amount_owed(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
        (**self).amount_owed(from, to)
    }

    fn initial_tracking_date(&self) -> Result<NaiveDate> {
        (**self).initial_tracking_date()
    }
}

impl<T: PaymentLedger + ?Sized> PaymentLedger for &T {
    type User = T::User;

    fn is_paid(&self, user: &Self::User, from: NaiveDate, to: NaiveDate) -> Result<bool> {
        (**self).is_paid(user, from, to)
    }

    fn record(&self, payment: &Payment, user: &Self::User) -> Result<()> {
        (**self).record(payment, user)
    }
}

impl<T: PaymentLedger + ?Sized> PaymentLedger for Arc<T> {
    type User = T::User;

    fn is_paid(&self, user: &Self::User, from: NaiveDate, to: NaiveDate) -> Result<bool> {
        (**self).is_paid(user, from, to)
    }

    fn record(&self, payment: &Payment, user: &Self::User) -> Result<()> {
        (**self).record(payment, user)
    }
}

/// Validates and records payments, and rebuilds per-month paid/unpaid summaries.
///
/// Holds no state beyond its collaborators, which are fixed at construction.
pub struct PaymentManager<O, L, C = SystemClock> {
    oracle: O,
    ledger: L,
    clock: C,
}

impl<O, L> PaymentManager<O, L, SystemClock>
where
    O: DueOracle,
    L: PaymentLedger,
{
    pub fn new(oracle: O, ledger: L) -> Self {
        Self::with_clock(oracle, ledger, SystemClock)
    }
}

impl<O, L, C> PaymentManager<O, L, C>
where
    O: DueOracle,
    L: PaymentLedger,
    C: Clock,
{
    pub fn with_clock(oracle: O, ledger: L, clock: C) -> Self {
        Self {
            oracle,
            ledger,
            clock,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Validates `payment` for `user` and hands it to the ledger.
    ///
    /// Fails with [`DuesError::UserAlreadyPaid`] when the range is already settled, checked
    /// first, then with [`DuesError::InsufficientAmount`] when the range costs more than the
    /// payment offers. The ledger is only written once both checks pass.
    pub fn pay(&self, payment: &Payment, user: &L::User) -> Result<()> {
        self.validate(payment, user)?;
        self.ledger.record(payment, user)?;
        debug!(
            from = %payment.from(),
            to = %payment.to(),
            amount = %payment.amount(),
            "payment recorded"
        );
        Ok(())
    }

    /// Months from the initial tracking date through the current month that are still owed.
    pub fn unpaid_dues(&self, user: &L::User) -> Result<Vec<DueSummaryEntry>> {
        self.collect_dues(user, false)
    }

    /// Months from the initial tracking date through the current month that are settled.
    pub fn paid_dues(&self, user: &L::User) -> Result<Vec<DueSummaryEntry>> {
        self.collect_dues(user, true)
    }

    pub fn outstanding_balance(&self, user: &L::User) -> Result<Decimal> {
        total(&self.unpaid_dues(user)?)
    }

    fn collect_dues(&self, user: &L::User, paid: bool) -> Result<Vec<DueSummaryEntry>> {
        let initial = self.oracle.initial_tracking_date()?;
        let months = month_range(Month::from_date(initial), None, &self.clock);
        debug!(%initial, months = months.len(), paid, "reconstructing dues");

        let mut entries = Vec::new();
        for month in months {
            if self.ledger.is_paid(user, month, month)? != paid {
                continue;
            }
            let amount = self.oracle.amount_owed(month, month)?;
            trace!(%month, %amount, paid, "due classified");
            entries.push(DueSummaryEntry::new(month, amount));
        }
        Ok(entries)
    }

    fn validate(&self, payment: &Payment, user: &L::User) -> Result<()> {
        let (from, to) = (payment.from(), payment.to());

        if self.ledger.is_paid(user, from, to)? {
            return Err(DuesError::UserAlreadyPaid { from, to });
        }

        let owed = self.oracle.amount_owed(from, to)?;
        if owed > payment.amount() {
            return Err(DuesError::InsufficientAmount {
                owed,
                offered: payment.amount(),
            });
        }
        Ok(())
    }
}
