// File: src/report.rs
//! Human-facing views of the ledger and the run history.

use crate::core::ledger::PairingLedger;
use crate::core::types::{Participant, Run};
use crate::error::{RotationError, RotationResult};
use crate::persistence::write_atomically;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Sorted, de-duplicated union of the roster and everyone in the ledger.
pub fn matrix_participants<'a>(roster: &'a [Participant], ledger: &'a PairingLedger) -> Vec<&'a str> {
    let mut names: Vec<&str> = roster
        .iter()
        .chain(ledger.participants())
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Lower-triangular CSV of pair counts. The diagonal and the upper
/// triangle stay blank since the matrix is symmetric.
pub fn write_pair_matrix<W: Write>(out: &mut W, participants: &[&str], ledger: &PairingLedger) -> io::Result<()> {
    let header: Vec<Cow<'_, str>> = participants.iter().map(|p| csv_field(p)).collect();
    writeln!(out, ",{}", header.join(","))?;

    for (i, row_name) in participants.iter().enumerate() {
        let mut row = vec![csv_field(row_name).into_owned()];
        for (j, col_name) in participants.iter().enumerate() {
            if i > j {
                row.push(ledger.get(row_name, col_name).to_string());
            } else {
                row.push(String::new());
            }
        }
        writeln!(out, "{}", row.join(","))?;
    }
    Ok(())
}

/// Week-by-week listing of every run, oldest first.
pub fn write_history_report<W: Write>(out: &mut W, runs: &[Run]) -> io::Result<()> {
    for (week, groups) in runs.iter().enumerate() {
        match groups.first() {
            Some(first) => writeln!(out, "Week {} (Groups of {})", week + 1, first.len())?,
            None => writeln!(out, "Week {}", week + 1)?,
        }
        for group in groups {
            writeln!(out, "{}", group.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One sentence per ordered pair that has met at least once.
pub fn pair_count_lines(ledger: &PairingLedger) -> Vec<String> {
    ledger
        .pairs()
        .into_iter()
        .map(|(a, b, n)| format!("{a} has worked with {b} {n} times."))
        .collect()
}

pub fn export_pair_matrix(path: &Path, roster: &[Participant], ledger: &PairingLedger) -> RotationResult<()> {
    let participants = matrix_participants(roster, ledger);
    write_atomically(path, |writer| {
        write_pair_matrix(writer, &participants, ledger).map_err(|e| RotationError::io(path, e))
    })?;
    info!(path = %path.display(), participants = participants.len(), "wrote pair count matrix");
    Ok(())
}

pub fn export_history_report(path: &Path, runs: &[Run]) -> RotationResult<()> {
    write_atomically(path, |writer| {
        write_history_report(writer, runs).map_err(|e| RotationError::io(path, e))
    })?;
    info!(path = %path.display(), weeks = runs.len(), "wrote group history report");
    Ok(())
}
