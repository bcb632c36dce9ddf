//! File-backed state tests: restart survival, atomic replacement, the
//! binary format and failure paths that must leave the file untouched.

use rotation_core::persistence::{load_from_disk, save_to_disk, PersistedState};
use rotation_core::report::{export_history_report, export_pair_matrix};
use rotation_core::{GroupAssigner, Participant, PairingLedger, RotationError};
use std::fs;
use tempfile::tempdir;

fn names(list: &[&str]) -> Vec<Participant> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn missing_state_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    assert!(load_from_disk(&path).unwrap().is_none());

    let assigner = GroupAssigner::open(names(&["a", "b"]), &path).unwrap();
    assert!(assigner.runs().is_empty());
    assert!(assigner.all_pair_counts().is_empty());
    assert!(!path.exists());
}

#[test]
fn history_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    let roster = names(&["A", "B", "C", "D"]);

    let mut first = GroupAssigner::open(roster.clone(), &path).unwrap();
    first.form_groups(2).unwrap();
    let ledger_before = first.all_pair_counts().clone();
    let runs_before = first.runs().to_vec();
    drop(first);

    let mut reopened = GroupAssigner::open(roster, &path).unwrap();
    assert_eq!(reopened.all_pair_counts(), &ledger_before);
    assert_eq!(reopened.runs(), runs_before.as_slice());

    let second = reopened.form_groups(2).unwrap();
    assert_eq!(second, vec![names(&["A", "C"]), names(&["B", "D"])]);

    let state = load_from_disk(&path).unwrap().unwrap();
    assert_eq!(state.groups.len(), 2);
    assert_eq!(state.groups[1], second);
    assert_eq!(state.pair_count, reopened.all_pair_counts().snapshot());
}

#[test]
fn saving_replaces_counts_instead_of_adding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    let roster = names(&["A", "B"]);

    let mut assigner = GroupAssigner::open(roster.clone(), &path).unwrap();
    for _ in 0..3 {
        assigner.form_groups(2).unwrap();
    }
    assigner.save().unwrap();

    let state = load_from_disk(&path).unwrap().unwrap();
    assert_eq!(state.pair_count["A"]["B"], 3);
    assert_eq!(state.pair_count["B"]["A"], 3);
    assert_eq!(state.groups.len(), 3);
}

#[test]
fn binary_state_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("history.bin");

    let mut assigner = GroupAssigner::open(names(&["a", "b", "c", "d", "e"]), &path).unwrap();
    assigner.form_groups(3).unwrap();
    assigner.form_groups(3).unwrap();

    let state = load_from_disk(&path).unwrap().unwrap();
    assert_eq!(state, PersistedState::from_parts(assigner.runs(), assigner.all_pair_counts()));
    assert!(serde_json::from_slice::<serde_json::Value>(&fs::read(&path).unwrap()).is_err());
}

#[test]
fn failed_run_leaves_state_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");

    let mut assigner = GroupAssigner::open(names(&["a", "b", "c"]), &path).unwrap();
    assigner.form_groups(3).unwrap();
    let before = fs::read(&path).unwrap();

    let err = assigner.form_groups(4).unwrap_err();
    assert!(matches!(err, RotationError::InvalidGroupSize { .. }));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(assigner.runs().len(), 1);
}

#[test]
fn failed_save_keeps_memory_in_step_with_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    let mut assigner = GroupAssigner::open(names(&["a", "b"]), &path).unwrap();

    // A non-empty directory where the file should be makes the final rename fail.
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupied"), b"x").unwrap();

    let err = assigner.form_groups(2).unwrap_err();
    assert!(matches!(err, RotationError::Io { .. }));
    assert!(assigner.runs().is_empty());
    assert!(assigner.all_pair_counts().is_empty());

    let state = PersistedState::from_parts(assigner.runs(), assigner.all_pair_counts());
    assert!(save_to_disk(&state, &path).is_err());
}

#[test]
fn corrupt_state_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    fs::write(&path, b"{ not json").unwrap();

    let err = GroupAssigner::open(names(&["a"]), &path).err().unwrap();
    assert!(matches!(err, RotationError::Decode { .. }));
}

#[test]
fn lopsided_state_is_normalized_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("group_data.json");
    fs::write(
        &path,
        r#"{ "groups": [[["a", "b"]]], "pair_count": { "a": { "b": 1 }, "b": {} } }"#,
    )
    .unwrap();

    let assigner = GroupAssigner::open(names(&["a", "b"]), &path).unwrap();
    assert_eq!(assigner.pair_count("b", "a"), 1);
    assert_eq!(assigner.runs().len(), 1);
}

#[test]
fn exports_are_written_next_to_state() {
    let dir = tempdir().unwrap();
    let roster = names(&["b", "a", "c"]);
    let mut ledger = PairingLedger::new();
    let runs = vec![vec![names(&["b", "a"]), names(&["c"])]];
    ledger.record_run(&runs[0]).unwrap();

    let matrix = dir.path().join("out").join("pair_count_matrix.csv");
    let report = dir.path().join("out").join("group_assignments.txt");
    export_pair_matrix(&matrix, &roster, &ledger).unwrap();
    export_history_report(&report, &runs).unwrap();

    assert_eq!(fs::read_to_string(&matrix).unwrap(), ",a,b,c\na,,,\nb,1,,\nc,0,0,\n");
    assert_eq!(
        fs::read_to_string(&report).unwrap(),
        "Week 1 (Groups of 2)\nb, a\nc\n\n"
    );
}
