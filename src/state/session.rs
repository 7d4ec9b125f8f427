//! Session lifecycle for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The persisted credential is the sole source of truth for "logged in".
//! `SessionState` derives the authenticated flag from it and is the only
//! writer of the storage slot. Feature code reaches it exclusively through the
//! `SessionHandle` capability provided in context, which is also what the
//! route gate watches.
//!
//! DESIGN
//! ======
//! Restoration validates the credential locally (decode + expiry) and fails
//! closed: anything unreadable or expired resolves to logged out and clears
//! storage. `login` trusts its caller and does not re-check expiry.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::util::clock::now_epoch_seconds;
use crate::util::credential::{SubjectId, decode_claims};
use crate::util::storage::{BrowserStorage, CredentialStorage};

/// Resolved authentication outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionResolution {
    Authenticated,
    Unauthenticated,
}

/// Lifecycle of the session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, restoration not yet started.
    Uninitialized,
    /// Restoration in progress; navigation decisions must wait.
    Restoring,
    Resolved(SessionResolution),
}

/// Derived authentication status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    authenticated: bool,
    initializing: bool,
    restore_started: bool,
    subject_id: Option<SubjectId>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { authenticated: false, initializing: true, restore_started: false, subject_id: None }
    }
}

impl SessionState {
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn initializing(&self) -> bool {
        self.initializing
    }

    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject_id.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.initializing, self.restore_started, self.authenticated) {
            (true, false, _) => SessionPhase::Uninitialized,
            (true, true, _) => SessionPhase::Restoring,
            (false, _, true) => SessionPhase::Resolved(SessionResolution::Authenticated),
            (false, _, false) => SessionPhase::Resolved(SessionResolution::Unauthenticated),
        }
    }

    /// Mark restoration as started without resolving it.
    pub fn begin_restore(&mut self) {
        self.restore_started = true;
    }

    /// Re-derive the session from the persisted credential at time `now`.
    ///
    /// Never fails: a missing, undecodable, or expired credential resolves to
    /// logged out, and the latter two also clear storage.
    pub fn restore(&mut self, storage: &dyn CredentialStorage, now: f64) {
        self.begin_restore();

        match storage.read() {
            None => {
                self.authenticated = false;
                self.subject_id = None;
            }
            Some(token) => match decode_claims(&token) {
                Ok(claims) if claims.is_live(now) => {
                    self.authenticated = true;
                    self.subject_id = claims.id;
                }
                Ok(_) => {
                    leptos::logging::log!("persisted credential expired; clearing session");
                    self.logout(storage);
                }
                Err(e) => {
                    leptos::logging::warn!("persisted credential unreadable ({e}); clearing session");
                    self.logout(storage);
                }
            },
        }

        self.initializing = false;
    }

    /// Persist `credential` verbatim and mark the session authenticated.
    ///
    /// The subject id is filled in from the credential when it decodes;
    /// decode failures leave it empty but do not affect `authenticated`.
    pub fn login(&mut self, storage: &dyn CredentialStorage, credential: &str) {
        storage.write(credential);
        self.authenticated = true;
        self.subject_id = decode_claims(credential).ok().and_then(|claims| claims.id);
    }

    /// Clear the persisted credential and the derived session. Idempotent.
    pub fn logout(&mut self, storage: &dyn CredentialStorage) {
        storage.clear();
        self.authenticated = false;
        self.subject_id = None;
    }
}

/// Context-provided capability over the session.
///
/// Reads are reactive; mutators update the underlying signal so the route
/// gate and any subject-dependent page re-run.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    state: RwSignal<SessionState>,
    storage: StoredValue<BrowserStorage>,
}

impl SessionHandle {
    pub fn new(storage: BrowserStorage) -> Self {
        Self { state: RwSignal::new(SessionState::default()), storage: StoredValue::new(storage) }
    }

    /// Read-only view of the state for reactive consumers.
    pub fn state(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    pub fn authenticated(&self) -> bool {
        self.state.with(SessionState::authenticated)
    }

    pub fn initializing(&self) -> bool {
        self.state.with(SessionState::initializing)
    }

    pub fn subject_id(&self) -> Option<SubjectId> {
        self.state.with(|s| s.subject_id().cloned())
    }

    pub fn restore(&self) {
        let now = now_epoch_seconds();
        self.storage.with_value(|storage| self.state.update(|s| s.restore(storage, now)));
    }

    pub fn login(&self, credential: &str) {
        self.storage.with_value(|storage| self.state.update(|s| s.login(storage, credential)));
    }

    pub fn logout(&self) {
        self.storage.with_value(|storage| self.state.update(|s| s.logout(storage)));
    }
}
