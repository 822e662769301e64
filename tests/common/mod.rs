#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use dues_core::{
    dues::MonthRange, DueOracle, DuesError, Month, Payment, PaymentLedger, Result, UnitIdentity,
};
use rust_decimal::Decimal;

/// Collaborator calls in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsPaid(NaiveDate, NaiveDate),
    Record(NaiveDate, NaiveDate, Decimal),
    AmountOwed(NaiveDate, NaiveDate),
    InitialTrackingDate,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn month(raw: &str) -> Month {
    raw.parse().expect("valid month")
}

pub fn resident() -> UnitIdentity {
    UnitIdentity::new("1", "12", "4")
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().expect("call log").clone()
}

/// Ledger with a fixed set of settled ranges, matched exactly, that logs every call.
pub struct ScriptedLedger {
    paid: BTreeSet<(NaiveDate, NaiveDate)>,
    fail_checks: bool,
    log: CallLog,
}

impl ScriptedLedger {
    pub fn new(log: CallLog) -> Self {
        Self {
            paid: BTreeSet::new(),
            fail_checks: false,
            log,
        }
    }

    pub fn with_paid(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.paid.insert((from, to));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_checks = true;
        self
    }

    pub fn record_count(&self) -> usize {
        calls(&self.log)
            .iter()
            .filter(|call| matches!(call, Call::Record(..)))
            .count()
    }

    fn push(&self, call: Call) {
        self.log.lock().expect("call log").push(call);
    }
}

impl PaymentLedger for ScriptedLedger {
    type User = UnitIdentity;

    fn is_paid(&self, _user: &UnitIdentity, from: NaiveDate, to: NaiveDate) -> Result<bool> {
        self.push(Call::IsPaid(from, to));
        if self.fail_checks {
            return Err(DuesError::Ledger("ledger offline".into()));
        }
        Ok(self.paid.contains(&(from, to)))
    }

    fn record(&self, payment: &Payment, _user: &UnitIdentity) -> Result<()> {
        self.push(Call::Record(payment.from(), payment.to(), payment.amount()));
        Ok(())
    }
}

/// Oracle charging a flat amount per month, with per-month overrides, that logs every call.
pub struct ScriptedOracle {
    initial: NaiveDate,
    monthly: Decimal,
    overrides: BTreeMap<Month, Decimal>,
    fail_amounts: bool,
    log: CallLog,
}

impl ScriptedOracle {
    pub fn new(log: CallLog, initial: NaiveDate, monthly: Decimal) -> Self {
        Self {
            initial,
            monthly,
            overrides: BTreeMap::new(),
            fail_amounts: false,
            log,
        }
    }

    pub fn with_month(mut self, month: Month, amount: Decimal) -> Self {
        self.overrides.insert(month, amount);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_amounts = true;
        self
    }

    fn push(&self, call: Call) {
        self.log.lock().expect("call log").push(call);
    }
}

impl DueOracle for ScriptedOracle {
    fn amount_owed(&self, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
        self.push(Call::AmountOwed(from, to));
        if self.fail_amounts {
            return Err(DuesError::Oracle("rates unavailable".into()));
        }
        Ok(MonthRange::between(from, to)
            .map(|month| self.overrides.get(&month).copied().unwrap_or(self.monthly))
            .sum())
    }

    fn initial_tracking_date(&self) -> Result<NaiveDate> {
        self.push(Call::InitialTrackingDate);
        Ok(self.initial)
    }
}
