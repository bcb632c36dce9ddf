// File: src/persistence.rs
use crate::core::ledger::{LedgerSnapshot, PairingLedger};
use crate::core::types::Run;
use crate::error::{RotationError, RotationResult};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// The durable record: every run so far plus the full ledger.
/// Field names match the JSON layout other tools read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub groups: Vec<Run>,
    #[serde(default)]
    pub pair_count: LedgerSnapshot,
}

impl PersistedState {
    pub fn from_parts(runs: &[Run], ledger: &PairingLedger) -> Self {
        Self {
            groups: runs.to_vec(),
            pair_count: ledger.snapshot(),
        }
    }

    pub fn ledger(&self) -> PairingLedger {
        PairingLedger::from_snapshot(&self.pair_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFormat {
    Json,
    Binary,
}

impl StateFormat {
    /// `.bin` files hold bincode; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") => StateFormat::Binary,
            _ => StateFormat::Json,
        }
    }
}

/// Writes a file by filling a temp file next to it and renaming it into
/// place, so readers see either the old content or the new, never half.
pub fn write_atomically<F>(path: &Path, fill: F) -> RotationResult<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> RotationResult<()>,
{
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| RotationError::io(parent_dir, e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| RotationError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        fill(&mut writer)?;
        writer.flush().map_err(|e| RotationError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| RotationError::io(path, e.error))?;
    Ok(())
}

pub fn save_to_disk(state: &PersistedState, path: &Path) -> RotationResult<()> {
    let format = StateFormat::from_path(path);
    write_atomically(path, |writer| {
        let encoded = match format {
            StateFormat::Json => serde_json::to_writer_pretty(&mut *writer, state).map_err(|e| e.to_string()),
            StateFormat::Binary => bincode::serialize_into(&mut *writer, state).map_err(|e| e.to_string()),
        };
        encoded.map_err(|message| RotationError::Encode {
            path: path.to_path_buf(),
            message,
        })
    })?;

    info!(path = %path.display(), runs = state.groups.len(), "saved group history");
    Ok(())
}

/// Reads the durable record. A missing file is not an error: it means no
/// runs have happened yet, and `None` is returned.
pub fn load_from_disk(path: &Path) -> RotationResult<Option<PersistedState>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RotationError::io(path, e)),
    };
    let reader = BufReader::new(file);

    let decoded = match StateFormat::from_path(path) {
        StateFormat::Json => serde_json::from_reader(reader).map_err(|e| e.to_string()),
        StateFormat::Binary => bincode::deserialize_from(reader).map_err(|e| e.to_string()),
    };
    let state: PersistedState = decoded.map_err(|message| RotationError::Decode {
        path: path.to_path_buf(),
        message,
    })?;

    info!(path = %path.display(), runs = state.groups.len(), "loaded group history");
    Ok(Some(state))
}
