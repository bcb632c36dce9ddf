// File: src/core/ledger.rs
use crate::core::types::{Participant, Run};
use crate::error::{RotationError, RotationResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

/// Durable form of the ledger: participant -> partner -> count.
/// Ordered maps keep the on-disk record stable between saves.
pub type LedgerSnapshot = BTreeMap<Participant, BTreeMap<Participant, u64>>;

/// Sparse, symmetric store of how often each pair of participants has
/// shared a group. A missing entry means the pair has never met.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingLedger {
    /// Maps participant -> (partner -> times grouped together).
    /// Every entry is mirrored: counts[a][b] == counts[b][a].
    counts: HashMap<Participant, HashMap<Participant, u64>>,
}

impl PairingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from a durable snapshot.
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let mut ledger = Self::new();
        ledger.load_from(snapshot);
        ledger
    }

    /// Times `a` and `b` have been grouped together; 0 if never.
    /// Lookups never insert.
    pub fn get(&self, a: &str, b: &str) -> u64 {
        self.counts
            .get(a)
            .and_then(|partners| partners.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Records one more co-occurrence of `a` and `b`, on both sides.
    pub fn increment(&mut self, a: &str, b: &str) -> RotationResult<()> {
        if a == b {
            return Err(RotationError::InvalidPair {
                participant: a.to_string(),
            });
        }
        *self
            .counts
            .entry(a.to_string())
            .or_default()
            .entry(b.to_string())
            .or_insert(0) += 1;
        *self
            .counts
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    /// Applies every within-group pair of a run. This is the only way the
    /// ledger advances once loaded. The ledger is left untouched if any
    /// group contains the same participant twice.
    pub fn record_run(&mut self, run: &Run) -> RotationResult<()> {
        for group in run {
            let mut seen = BTreeSet::new();
            for member in group {
                if !seen.insert(member.as_str()) {
                    return Err(RotationError::InvalidPair {
                        participant: member.clone(),
                    });
                }
            }
        }

        for group in run {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    self.increment(a, b)?;
                }
            }
        }
        Ok(())
    }

    /// Replaces the whole ledger with the snapshot's counts. Nothing from
    /// the previous content survives.
    ///
    /// Snapshots written by hand or by older tools may be lopsided, so the
    /// input is normalized: self pairs and zero counts are dropped, and a
    /// pair stored with two different counts keeps the larger on both sides.
    pub fn load_from(&mut self, snapshot: &LedgerSnapshot) {
        self.counts.clear();
        let mut repaired = 0usize;

        for (a, partners) in snapshot {
            for (b, &count) in partners {
                if a == b || count == 0 {
                    repaired += 1;
                    continue;
                }
                let reverse = snapshot.get(b).and_then(|p| p.get(a)).copied();
                if reverse != Some(count) {
                    repaired += 1;
                }
                let merged = count.max(reverse.unwrap_or(0));
                self.counts
                    .entry(a.clone())
                    .or_default()
                    .insert(b.clone(), merged);
                self.counts
                    .entry(b.clone())
                    .or_default()
                    .insert(a.clone(), merged);
            }
        }

        if repaired > 0 {
            warn!(entries = repaired, "normalized asymmetric or invalid pair counts in snapshot");
        }
    }

    /// Full copy of the current counts in durable form.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.counts
            .iter()
            .map(|(a, partners)| {
                let row = partners.iter().map(|(b, &n)| (b.clone(), n)).collect();
                (a.clone(), row)
            })
            .collect()
    }

    /// Every participant with at least one recorded pairing, sorted.
    pub fn participants(&self) -> Vec<&Participant> {
        let mut names: Vec<&Participant> = self.counts.keys().collect();
        names.sort();
        names
    }

    /// Every ordered pair with a nonzero count, sorted by (a, b).
    pub fn pairs(&self) -> Vec<(&Participant, &Participant, u64)> {
        let mut pairs: Vec<_> = self
            .counts
            .iter()
            .flat_map(|(a, partners)| partners.iter().map(move |(b, &n)| (a, b, n)))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
