use super::*;

#[test]
fn save_then_read_returns_identical_string() {
    let store = MemoryTokenStore::new();
    store.save("aaa.bbb.ccc");
    assert_eq!(store.read().as_deref(), Some("aaa.bbb.ccc"));
}

#[test]
fn new_store_is_empty() {
    assert!(MemoryTokenStore::new().read().is_none());
}

#[test]
fn clear_empties_the_slot() {
    let store = MemoryTokenStore::with_credential("x.y.z");
    store.clear();
    assert!(store.read().is_none());
}

#[test]
fn save_overwrites_previous_credential() {
    let store = MemoryTokenStore::with_credential("old.old.old");
    store.save("new.new.new");
    assert_eq!(store.read().as_deref(), Some("new.new.new"));
}
