// src/core/mod.rs

pub mod assigner;
pub mod ledger;
pub mod partition;
pub mod types;
