use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Month;
use crate::errors::{DuesError, Result};

/// A proposed settlement of the dues between two dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    amount: Decimal,
    from: NaiveDate,
    to: NaiveDate,
}

impl Payment {
    pub fn new(amount: Decimal, from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(DuesError::InvalidInput(format!(
                "payment amount must not be negative, got {amount}"
            )));
        }
        if from > to {
            return Err(DuesError::InvalidInput(format!(
                "payment range starts after it ends: {from} > {to}"
            )));
        }
        Ok(Self { amount, from, to })
    }

    /// Payment covering every month from `from` through `to`, both given as whole months.
    pub fn for_months(amount: Decimal, from: Month, to: Month) -> Result<Self> {
        Self::new(amount, from.first_day(), to.first_day())
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }
}

/// What was owed for a single month, as reconstructed from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSummaryEntry {
    pub month: NaiveDate,
    pub amount: Decimal,
}

impl DueSummaryEntry {
    pub fn new(month: NaiveDate, amount: Decimal) -> Self {
        Self { month, amount }
    }
}

/// Adds up amounts, failing with [`DuesError::Oracle`] instead of overflowing.
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| DuesError::Oracle("amount overflow".into()))
    })
}

/// Sums the amounts of a due summary.
pub fn total(entries: &[DueSummaryEntry]) -> Result<Decimal> {
    checked_sum(entries.iter().map(|entry| entry.amount))
}

/// Identity of a member unit within an association, addressed by phase, block and lot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitIdentity {
    pub phase: String,
    pub block: String,
    pub lot: String,
}

impl UnitIdentity {
    pub fn new(phase: impl Into<String>, block: impl Into<String>, lot: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            block: block.into(),
            lot: lot.into(),
        }
    }
}

impl fmt::Display for UnitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Phase {} / Block {} / Lot {}",
            self.phase, self.block, self.lot
        )
    }
}
