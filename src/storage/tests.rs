use std::fs;
use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::model::{PairKey, PatchId};
use crate::registry::{DecisionState, RegistryError};

fn pid(s: &str) -> PatchId {
    PatchId::parse(s).unwrap()
}

fn pair(a: &str, b: &str) -> PairKey {
    PairKey::new(pid(a), pid(b)).unwrap()
}

fn create_test_store() -> (DecisionStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DecisionStore::open(StoreLayout::new(dir.path().join("data")))
        .expect("Failed to open store");
    (store, dir)
}

#[test]
fn test_parse_pairs_skips_comments_and_blank_lines() {
    let text = "# header\n\na b\n  # note\nc   d  \n";
    let pairs = parse_pairs(Cursor::new(text), Path::new("t.txt")).unwrap();
    assert_eq!(pairs, vec![pair("a", "b"), pair("c", "d")]);
}

#[test]
fn test_parse_pairs_reports_malformed_line() {
    for (text, line) in [
        ("# h\na b\nlonely\n", 3),
        ("a b c\n", 1),
        ("# h\n\nx x\n", 3),
    ] {
        let err = parse_pairs(Cursor::new(text), Path::new("s.txt")).unwrap_err();
        match err {
            StorageError::Malformed { path, line: at, .. } => {
                assert_eq!(path, Path::new("s.txt"));
                assert_eq!(at, line, "input {:?}", text);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn test_render_then_parse_preserves_order() {
    let pairs = vec![pair("z", "a"), pair("b", "c")];
    let text = render_pairs("test", &pairs);
    assert!(text.starts_with("# test\n"));
    assert!(text.contains("a z\n"));
    let parsed = parse_pairs(Cursor::new(text), Path::new("t")).unwrap();
    assert_eq!(parsed, pairs);
}

#[test]
fn test_write_atomic_replaces_content_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("file.txt");

    write_atomic(&path, b"first").unwrap();
    write_atomic(&path, b"second").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"second");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_atomic_into_missing_directory_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("file.txt");
    assert!(matches!(write_atomic(&path, b"x"), Err(StorageError::Io(_))));
    assert!(!path.exists());
}

#[test]
fn test_open_creates_data_dir_and_empty_load() {
    let (store, _dir) = create_test_store();
    assert!(store.layout().root().is_dir());

    let state = store.load().unwrap();
    assert!(state.registry().is_empty());
    assert!(state.rejections().is_empty());
}

#[test]
fn test_flush_then_load_restores_state() {
    let (store, _dir) = create_test_store();

    let mut state = DecisionState::empty();
    state.confirm(&pid("a"), &pid("b")).unwrap();
    state.confirm(&pid("b"), &pid("c")).unwrap();
    state.deny(&pid("a"), &pid("d")).unwrap();
    store.flush(&state).unwrap();

    let layout = store.layout();
    for path in [
        layout.similar_text(),
        layout.similar_snapshot(),
        layout.rejected_text(),
        layout.rejected_snapshot(),
    ] {
        assert!(path.is_file(), "{} missing", path.display());
    }

    let loaded = store.load().unwrap();
    assert!(loaded.registry().are_related(&pid("a"), &pid("c")));
    assert!(loaded.rejections().is_rejected(&pid("d"), &pid("a")));
    assert_eq!(
        loaded.registry().to_persisted_form(),
        state.registry().to_persisted_form()
    );
}

#[test]
fn test_edited_text_wins_over_stale_snapshot() {
    let (store, _dir) = create_test_store();

    let mut state = DecisionState::empty();
    state.confirm(&pid("a"), &pid("b")).unwrap();
    store.flush(&state).unwrap();

    fs::write(store.layout().similar_text(), "# edited by hand\nx y\n").unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.registry().are_related(&pid("x"), &pid("y")));
    assert!(!loaded.registry().are_related(&pid("a"), &pid("b")));
}

#[test]
fn test_snapshot_used_when_text_is_missing() {
    let (store, _dir) = create_test_store();

    let mut state = DecisionState::empty();
    state.confirm(&pid("a"), &pid("b")).unwrap();
    store.flush(&state).unwrap();
    fs::remove_file(store.layout().similar_text()).unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.registry().are_related(&pid("a"), &pid("b")));
}

#[test]
fn test_corrupt_snapshot_falls_back_to_text() {
    let (store, _dir) = create_test_store();

    let mut state = DecisionState::empty();
    state.deny(&pid("a"), &pid("b")).unwrap();
    store.flush(&state).unwrap();
    fs::write(store.layout().rejected_snapshot(), [0xFFu8; 64]).unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.rejections().is_rejected(&pid("a"), &pid("b")));
}

#[test]
fn test_corrupt_snapshot_without_text_fails() {
    let (store, _dir) = create_test_store();
    fs::write(store.layout().rejected_snapshot(), [0xFFu8; 64]).unwrap();

    assert!(matches!(store.load(), Err(StorageError::Snapshot { .. })));
}

#[test]
fn test_malformed_text_is_fatal() {
    let (store, _dir) = create_test_store();
    fs::write(store.layout().similar_text(), "# h\na b\nc\n").unwrap();

    match store.load() {
        Err(StorageError::Malformed { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_conflicting_stores_refuse_to_load() {
    let (store, _dir) = create_test_store();
    fs::write(store.layout().similar_text(), "# h\na b\nb c\n").unwrap();
    fs::write(store.layout().rejected_text(), "# h\nc a\n").unwrap();

    match store.load() {
        Err(StorageError::Registry(RegistryError::Conflict { pairs })) => {
            assert_eq!(pairs, vec![pair("a", "c")]);
        }
        other => panic!("unexpected result {other:?}"),
    }
}
