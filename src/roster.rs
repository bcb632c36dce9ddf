// File: src/roster.rs
use crate::core::types::Participant;
use crate::error::{RotationError, RotationResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One participant per line. Lines are trimmed, blank lines skipped and
/// repeated names dropped (the first occurrence keeps its position).
pub fn parse_roster(text: &str) -> Vec<Participant> {
    let mut seen = HashSet::new();
    let mut roster = Vec::new();
    for name in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if seen.insert(name) {
            roster.push(name.to_string());
        } else {
            warn!(participant = name, "dropping duplicate roster entry");
        }
    }
    roster
}

pub fn load_roster(path: &Path) -> RotationResult<Vec<Participant>> {
    let text = fs::read_to_string(path).map_err(|e| RotationError::io(path, e))?;
    let roster = parse_roster(&text);
    info!(path = %path.display(), participants = roster.len(), "loaded roster");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_skips_blank_lines() {
        let roster = parse_roster("  Ana \n\nBen\r\n\t\nCleo\n");
        assert_eq!(roster, vec!["Ana", "Ben", "Cleo"]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let roster = parse_roster("Ben\nAna\nBen \nCleo\n");
        assert_eq!(roster, vec!["Ben", "Ana", "Cleo"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_roster(Path::new("/definitely/not/here/students.txt")).unwrap_err();
        assert!(matches!(err, RotationError::Io { .. }));
    }
}
