use std::{
    collections::{BTreeSet, HashMap},
    hash::Hash,
    sync::{Mutex, MutexGuard},
};

use chrono::NaiveDate;
use tracing::debug;

use crate::core::PaymentLedger;
use crate::dues::{Month, MonthRange, Payment};
use crate::errors::{DuesError, Result};

#[derive(Debug, Default)]
struct Account {
    paid_months: BTreeSet<Month>,
    receipts: Vec<Payment>,
}

impl Account {
    fn covers(&self, from: NaiveDate, to: NaiveDate) -> bool {
        from <= to
            && MonthRange::between(from, to).all(|month| self.paid_months.contains(&month))
    }
}

/// In-process ledger keyed by user identity.
///
/// A range counts as paid once every month it touches is covered by some recorded payment.
/// `record` re-checks coverage under the same lock it writes with, so two racing payments
/// for one range cannot both land.
#[derive(Debug)]
pub struct MemoryLedger<U> {
    accounts: Mutex<HashMap<U, Account>>,
}

impl<U> Default for MemoryLedger<U> {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }
}

impl<U> MemoryLedger<U>
where
    U: Eq + Hash + Clone + Send,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Payments recorded for `user`, oldest first.
    pub fn receipts(&self, user: &U) -> Result<Vec<Payment>> {
        Ok(self
            .lock()?
            .get(user)
            .map(|account| account.receipts.clone())
            .unwrap_or_default())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<U, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| DuesError::Ledger("memory ledger lock poisoned".into()))
    }
}

impl<U> PaymentLedger for MemoryLedger<U>
where
    U: Eq + Hash + Clone + Send,
{
    type User = U;

    fn is_paid(&self, user: &U, from: NaiveDate, to: NaiveDate) -> Result<bool> {
        Ok(self
            .lock()?
            .get(user)
            .is_some_and(|account| account.covers(from, to)))
    }

    fn record(&self, payment: &Payment, user: &U) -> Result<()> {
        let (from, to) = (payment.from(), payment.to());
        let mut accounts = self.lock()?;
        let account = accounts.entry(user.clone()).or_default();
        if account.covers(from, to) {
            return Err(DuesError::UserAlreadyPaid { from, to });
        }
        account.paid_months.extend(MonthRange::between(from, to));
        account.receipts.push(payment.clone());
        debug!(%from, %to, receipts = account.receipts.len(), "memory ledger recorded payment");
        Ok(())
    }
}
