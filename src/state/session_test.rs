use super::*;
use crate::util::credential::unsigned_token;
use crate::util::storage::MemoryStorage;
use serde_json::json;

const NOW: f64 = 1_700_000_000.0;

fn token(exp: f64, id: i64) -> String {
    unsigned_token(&json!({ "exp": exp, "id": id }))
}

fn restored(storage: &MemoryStorage) -> SessionState {
    let mut state = SessionState::default();
    state.restore(storage, NOW);
    state
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_state_is_initializing_and_unauthenticated() {
    let state = SessionState::default();
    assert!(state.initializing());
    assert!(!state.authenticated());
    assert_eq!(state.subject_id(), None);
    assert_eq!(state.phase(), SessionPhase::Uninitialized);
}

#[test]
fn begin_restore_enters_restoring_phase() {
    let mut state = SessionState::default();
    state.begin_restore();
    assert_eq!(state.phase(), SessionPhase::Restoring);
    assert!(state.initializing());
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_without_credential_resolves_unauthenticated() {
    let storage = MemoryStorage::new();
    let state = restored(&storage);
    assert!(!state.initializing());
    assert!(!state.authenticated());
    assert_eq!(state.phase(), SessionPhase::Resolved(SessionResolution::Unauthenticated));
}

#[test]
fn restore_live_credential_authenticates_with_subject() {
    let storage = MemoryStorage::with_credential(token(NOW + 3600.0, 7));
    let state = restored(&storage);
    assert!(state.authenticated());
    assert!(!state.initializing());
    assert_eq!(state.subject_id(), Some(&SubjectId::from(7)));
    assert_eq!(state.phase(), SessionPhase::Resolved(SessionResolution::Authenticated));
    assert!(storage.read().is_some());
}

#[test]
fn restore_live_credential_with_unusable_subject_stays_authenticated() {
    let storage = MemoryStorage::with_credential(unsigned_token(&json!({ "exp": NOW + 3600.0, "id": "" })));
    let state = restored(&storage);
    assert!(state.authenticated());
    assert_eq!(state.subject_id(), None);
    assert!(storage.read().is_some());
}

#[test]
fn restore_expired_credential_logs_out_and_clears_storage() {
    let storage = MemoryStorage::with_credential(token(NOW - 1.0, 42));
    let state = restored(&storage);
    assert!(!state.authenticated());
    assert!(!state.initializing());
    assert_eq!(state.subject_id(), None);
    assert_eq!(storage.read(), None);
}

#[test]
fn restore_credential_expiring_exactly_now_is_rejected() {
    let storage = MemoryStorage::with_credential(token(NOW, 1));
    assert!(!restored(&storage).authenticated());
    assert_eq!(storage.read(), None);
}

#[test]
fn restore_credential_without_expiry_is_rejected() {
    let storage = MemoryStorage::with_credential(unsigned_token(&json!({ "id": 3 })));
    assert!(!restored(&storage).authenticated());
    assert_eq!(storage.read(), None);
}

#[test]
fn restore_malformed_credential_behaves_like_expired() {
    let malformed = MemoryStorage::with_credential("not-a-token");
    let expired = MemoryStorage::with_credential(token(NOW - 60.0, 42));
    let a = restored(&malformed);
    let b = restored(&expired);
    assert_eq!(a, b);
    assert_eq!(malformed.read(), None);
    assert_eq!(expired.read(), None);
}

#[test]
fn restore_is_repeatable_after_cleanup() {
    let storage = MemoryStorage::with_credential("garbage");
    let mut state = SessionState::default();
    state.restore(&storage, NOW);
    state.restore(&storage, NOW);
    assert!(!state.authenticated());
    assert_eq!(storage.read(), None);
}

// =============================================================
// login / logout
// =============================================================

#[test]
fn login_persists_verbatim_and_authenticates_without_checks() {
    let storage = MemoryStorage::new();
    let mut state = restored(&storage);
    state.login(&storage, "<new-token>");
    assert!(state.authenticated());
    assert_eq!(storage.read().as_deref(), Some("<new-token>"));
    assert_eq!(state.subject_id(), None);
}

#[test]
fn login_with_expired_token_still_authenticates() {
    let storage = MemoryStorage::new();
    let mut state = restored(&storage);
    state.login(&storage, &token(NOW - 500.0, 9));
    assert!(state.authenticated());
    assert_eq!(state.subject_id(), Some(&SubjectId::from(9)));
}

#[test]
fn logout_clears_storage_and_subject() {
    let storage = MemoryStorage::with_credential(token(NOW + 60.0, 7));
    let mut state = restored(&storage);
    state.logout(&storage);
    assert!(!state.authenticated());
    assert_eq!(state.subject_id(), None);
    assert_eq!(storage.read(), None);
}

#[test]
fn logout_without_credential_is_noop() {
    let storage = MemoryStorage::new();
    let mut state = restored(&storage);
    let before = state.clone();
    state.logout(&storage);
    assert_eq!(state, before);
}

#[test]
fn logout_then_restore_never_resurrects_session() {
    let storage = MemoryStorage::new();
    let mut state = restored(&storage);
    state.login(&storage, &token(NOW + 3600.0, 5));
    state.logout(&storage);

    let mut fresh = SessionState::default();
    fresh.restore(&storage, NOW);
    assert!(!fresh.authenticated());
}
