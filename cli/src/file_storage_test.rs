use hotelsocial_session::{AuthSession, TokenPair, TokenStore};

use super::*;

fn storage(dir: &tempfile::TempDir) -> FileStorage {
    FileStorage::new(dir.path().join("nested").join("session.json"))
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    assert_eq!(storage.get_item("accessToken"), Ok(None));
    assert_eq!(storage.remove_item("accessToken"), Ok(()));
    assert!(!storage.path().exists());
}

#[test]
fn set_creates_parent_directories_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    storage.set_item("accessToken", "a1").expect("write");

    let reopened = FileStorage::new(storage.path());
    assert_eq!(reopened.get_item("accessToken"), Ok(Some("a1".to_owned())));
}

#[test]
fn file_is_a_flat_json_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    storage.set_item("accessToken", "a1").expect("write");
    storage.set_item("refreshToken", "r1").expect("write");

    let text = fs::read_to_string(storage.path()).expect("read");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "accessToken": "a1", "refreshToken": "r1" })
    );
}

#[test]
fn remove_keeps_other_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    storage.set_item("accessToken", "a1").expect("write");
    storage.set_item("refreshToken", "r1").expect("write");
    storage.remove_item("accessToken").expect("remove");

    assert_eq!(storage.get_item("accessToken"), Ok(None));
    assert_eq!(storage.get_item("refreshToken"), Ok(Some("r1".to_owned())));
}

#[test]
fn corrupt_file_is_a_backend_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    fs::write(&path, "not json").expect("write");

    let storage = FileStorage::new(path);
    assert!(matches!(
        storage.get_item("accessToken"),
        Err(StorageError::Backend(_))
    ));
}

#[cfg(unix)]
#[test]
fn written_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    storage.set_item("accessToken", "a1").expect("write");
    let mode = fs::metadata(storage.path()).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn token_store_and_session_share_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage(&dir);
    TokenStore::new(storage.clone()).save_tokens(&TokenPair::new("a1", "r1"));

    let mut session = AuthSession::new(FileStorage::new(storage.path()));
    session.initialize();
    assert_eq!(session.state().tokens(), Some(&TokenPair::new("a1", "r1")));

    session.logout();
    assert_eq!(TokenStore::new(storage).tokens(), None);
}
