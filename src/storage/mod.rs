//! Ledger backends that ship with the crate.

pub mod memory_ledger;

pub use memory_ledger::MemoryLedger;
