// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod report;
pub mod roster;
pub use crate::core::assigner::GroupAssigner;
pub use crate::core::ledger::{LedgerSnapshot, PairingLedger};
pub use crate::core::types::{Group, Participant, PoolOrder, Run};
pub use crate::error::{RotationError, RotationResult};
