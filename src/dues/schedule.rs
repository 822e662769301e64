use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{checked_sum, Month, MonthRange};
use crate::core::DueOracle;
use crate::errors::Result;

/// Flat monthly dues with per-month overrides, starting at a fixed tracking month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueSchedule {
    initial: Month,
    monthly_amount: Decimal,
    overrides: BTreeMap<Month, Decimal>,
}

impl DueSchedule {
    pub fn new(initial: Month, monthly_amount: Decimal) -> Self {
        Self {
            initial,
            monthly_amount,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, month: Month, amount: Decimal) -> Self {
        self.overrides.insert(month, amount);
        self
    }

    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (Month, Decimal)>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn initial_month(&self) -> Month {
        self.initial
    }

    /// Amount due for one month. Months before tracking started owe nothing.
    pub fn due_for_month(&self, month: Month) -> Decimal {
        if month < self.initial {
            return Decimal::ZERO;
        }
        self.overrides
            .get(&month)
            .copied()
            .unwrap_or(self.monthly_amount)
    }
}

impl DueOracle for DueSchedule {
    fn amount_owed(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
        checked_sum(MonthRange::between(from, to).map(|month| self.due_for_month(month)))
    }

    fn initial_tracking_date(&self) -> Result<NaiveDate> {
        Ok(self.initial.first_day())
    }
}
