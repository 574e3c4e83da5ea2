use registry::{MemoryTokenStore, TokenStore};

use super::*;
use crate::test_support::Harness;

fn session(name: &str, authorities: &[&str]) -> Session {
    Session {
        username: "amira".to_owned(),
        name: name.to_owned(),
        email: None,
        mobile: None,
        authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
        expires_at: time::OffsetDateTime::UNIX_EPOCH,
    }
}

// =============================================================
// AuthHandle
// =============================================================

#[test]
fn handle_starts_initializing() {
    let h = Harness::new(MemoryTokenStore::new());
    let handle = AuthHandle::new(h.context.clone());
    assert_eq!(handle.state.get_untracked(), AuthState::Initializing);
}

#[test]
fn logout_is_mirrored_into_signal() {
    let h = Harness::new(MemoryTokenStore::with_credential("a.b.c"));
    let handle = AuthHandle::new(h.context.clone());

    handle.logout();

    assert_eq!(handle.state.get_untracked(), AuthState::Anonymous);
    assert_eq!(h.store.read(), None);
    assert_eq!(*h.navigator.visited.lock().unwrap(), vec!["/login".to_owned()]);
}

#[test]
fn restore_without_credential_settles_anonymous() {
    let h = Harness::new(MemoryTokenStore::new());
    let handle = AuthHandle::new(h.context.clone());

    futures::executor::block_on(h.context.initialize());

    assert_eq!(handle.state.get_untracked(), AuthState::Anonymous);
    assert!(h.transport.urls().is_empty());
}

// =============================================================
// session_label
// =============================================================

#[test]
fn label_lists_authorities() {
    assert_eq!(session_label(&session("Amira Saleh", &["ADMIN", "USER"])), "Amira Saleh (ADMIN, USER)");
}

#[test]
fn label_falls_back_to_username_and_omits_empty_authorities() {
    assert_eq!(session_label(&session("", &[])), "amira");
}
