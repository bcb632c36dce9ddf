use crate::core::{ledger::PairingLedger, partition, types::{Participant, PoolOrder, Run}};
use crate::error::RotationResult;
use crate::persistence::{load_from_disk, save_to_disk, PersistedState};
use std::path::{Path, PathBuf};
use tracing::info;

// The assigner owns the roster, the ledger and the run history for one
// invocation. The ledger only advances through `form_groups`.
pub struct GroupAssigner {
    roster: Vec<Participant>,
    pool_order: PoolOrder,
    ledger: PairingLedger,
    runs: Vec<Run>,
    state_path: Option<PathBuf>,
}

impl GroupAssigner {
    /// An assigner with empty history that never touches disk.
    pub fn new(roster: Vec<Participant>) -> Self {
        Self {
            roster,
            pool_order: PoolOrder::default(),
            ledger: PairingLedger::new(),
            runs: Vec::new(),
            state_path: None,
        }
    }

    /// Loads history from `path` if it exists. Every later run is saved back there.
    pub fn open(roster: Vec<Participant>, path: impl AsRef<Path>) -> RotationResult<Self> {
        let path = path.as_ref();
        let mut assigner = Self::new(roster);
        if let Some(state) = load_from_disk(path)? {
            assigner.ledger = state.ledger();
            assigner.runs = state.groups;
        }
        assigner.state_path = Some(path.to_path_buf());
        Ok(assigner)
    }

    pub fn with_pool_order(mut self, order: PoolOrder) -> Self {
        self.pool_order = order;
        self
    }

    /// Forms the next run, records its pairings and persists the result.
    ///
    /// The updated ledger and history are staged on copies and written to
    /// disk first; memory only changes once the save has succeeded. On any
    /// error the assigner is exactly as it was before the call.
    pub fn form_groups(&mut self, group_size: usize) -> RotationResult<Run> {
        let run = self.preview(group_size)?;

        let mut ledger = self.ledger.clone();
        ledger.record_run(&run)?;

        if let Some(path) = &self.state_path {
            let mut runs = self.runs.clone();
            runs.push(run.clone());
            save_to_disk(&PersistedState::from_parts(&runs, &ledger), path)?;
        }

        self.ledger = ledger;
        self.runs.push(run.clone());
        info!(
            week = self.runs.len(),
            groups = run.len(),
            group_size,
            participants = self.roster.len(),
            "formed new groups"
        );
        Ok(run)
    }

    /// Computes what the next run would be without recording or saving it.
    pub fn preview(&self, group_size: usize) -> RotationResult<Run> {
        partition::form_groups(
            &self.roster,
            group_size,
            self.pool_order,
            self.runs.len(),
            &self.ledger,
        )
    }

    pub fn pair_count(&self, a: &str, b: &str) -> u64 {
        self.ledger.get(a, b)
    }

    pub fn all_pair_counts(&self) -> &PairingLedger {
        &self.ledger
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }

    /// Writes the current state again; a no-op for in-memory assigners.
    pub fn save(&self) -> RotationResult<()> {
        if let Some(path) = &self.state_path {
            save_to_disk(&PersistedState::from_parts(&self.runs, &self.ledger), path)
        } else {
            Ok(()) // Don't error if no path is set
        }
    }
}
