use std::fs;

use search_engine::{PersistError, StateFiles};
use tempfile::TempDir;

const HISTORY: &str = "history.ron";

#[test]
fn first_write_creates_nested_state_dir() {
    let temp = TempDir::new().unwrap();
    let files = StateFiles::new(temp.path().join("app").join("state"));

    files.write(HISTORY, "(recent: [\"강남\"])").unwrap();

    assert!(files.dir().is_dir());
    assert_eq!(
        files.read(HISTORY).unwrap().as_deref(),
        Some("(recent: [\"강남\"])")
    );
}

#[test]
fn newer_history_replaces_older() {
    let temp = TempDir::new().unwrap();
    let files = StateFiles::new(temp.path());

    files.write(HISTORY, "(recent: [\"강남\", \"래미안\"])").unwrap();
    files.write(HISTORY, "(recent: [])").unwrap();

    assert_eq!(files.read(HISTORY).unwrap().as_deref(), Some("(recent: [])"));
}

#[test]
fn write_leaves_only_the_target_behind() {
    let temp = TempDir::new().unwrap();
    let files = StateFiles::new(temp.path());

    files.write(HISTORY, "a").unwrap();
    files.write(HISTORY, "b").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![HISTORY]);
}

#[test]
fn history_never_written_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let files = StateFiles::new(temp.path().join("never-created"));

    assert!(files.read(HISTORY).unwrap().is_none());
    assert!(!files.dir().exists());
}

#[test]
fn state_dir_that_is_a_file_reports_the_target() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("state");
    fs::write(&blocker, "x").unwrap();

    let files = StateFiles::new(&blocker);
    match files.write(HISTORY, "data") {
        Err(PersistError::Write { path, .. }) => assert_eq!(path, blocker.join(HISTORY)),
        other => panic!("expected write error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
