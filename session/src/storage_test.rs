use super::*;

#[test]
fn memory_storage_round_trips_values() {
    let storage = MemoryStorage::new();
    storage.set_item("k", "v").expect("set");
    assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("v"));
}

#[test]
fn memory_storage_missing_key_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("absent").expect("get"), None);
}

#[test]
fn memory_storage_remove_missing_key_is_ok() {
    let storage = MemoryStorage::new();
    storage.remove_item("absent").expect("remove");
}

#[test]
fn memory_storage_clones_share_entries() {
    let a = MemoryStorage::new();
    let b = a.clone();
    a.set_item("shared", "1").expect("set");
    assert_eq!(b.get_item("shared").expect("get").as_deref(), Some("1"));
    b.remove_item("shared").expect("remove");
    assert_eq!(a.get_item("shared").expect("get"), None);
}
