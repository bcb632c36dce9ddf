// File: src/core/partition.rs
use crate::core::ledger::PairingLedger;
use crate::core::types::{Group, Participant, PoolOrder, Run};
use crate::error::{RotationError, RotationResult};
use tracing::debug;

/// Splits `roster` into groups of `group_size`, pairing each anchor with
/// the partners it has met least often according to `ledger`.
///
/// The pool starts as `order.arrange(roster, run_index)`. Each step takes
/// the first participant still in the pool as anchor, ranks the rest by
/// their count against the anchor (stable, so ties keep pool order), and
/// takes the first `group_size - 1`. Once fewer than `group_size` remain
/// they form the final, smaller group.
///
/// Greedy: cheap per anchor, but not a global minimum over all partitions.
/// The ledger is only read; recording the run is the caller's job.
pub fn form_groups(
    roster: &[Participant],
    group_size: usize,
    order: PoolOrder,
    run_index: usize,
    ledger: &PairingLedger,
) -> RotationResult<Run> {
    if group_size == 0 || group_size > roster.len() {
        return Err(RotationError::InvalidGroupSize {
            group_size,
            roster_size: roster.len(),
        });
    }

    let mut pool = order.arrange(roster, run_index);
    let mut run: Run = Vec::with_capacity(roster.len().div_ceil(group_size));

    while !pool.is_empty() {
        let anchor = pool.remove(0);

        let mut ranked: Vec<(usize, u64)> = pool
            .iter()
            .enumerate()
            .map(|(idx, other)| (idx, ledger.get(anchor, other)))
            .collect();
        ranked.sort_by_key(|&(_, count)| count);
        ranked.truncate(group_size - 1);

        let mut group: Group = Vec::with_capacity(ranked.len() + 1);
        group.push(anchor.clone());
        group.extend(ranked.iter().map(|&(idx, _)| pool[idx].clone()));

        let mut taken = vec![false; pool.len()];
        for &(idx, _) in &ranked {
            taken[idx] = true;
        }
        pool = pool
            .into_iter()
            .zip(taken)
            .filter_map(|(p, gone)| (!gone).then_some(p))
            .collect();

        debug!(anchor = %anchor, size = group.len(), remaining = pool.len(), "formed group");
        run.push(group);
    }

    Ok(run)
}
