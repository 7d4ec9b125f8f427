//! Persistence for the session credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! The credential is the only durable piece of client state. Access goes
//! through [`CredentialStorage`] so the session store can run against
//! `localStorage` in the browser and an in-memory slot everywhere else.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::sync::Mutex;

/// A single-slot credential store.
pub trait CredentialStorage {
    /// Return the persisted credential, if any.
    fn read(&self) -> Option<String>;
    /// Replace the persisted credential.
    fn write(&self, credential: &str);
    /// Remove the persisted credential. No-op when nothing is stored.
    fn clear(&self);
}

/// `localStorage`-backed credential slot under a fixed key.
///
/// Outside the browser every operation is a no-op and reads return `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserStorage {
    key: String,
}

impl BrowserStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl CredentialStorage for BrowserStorage {
    fn read(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(&self.key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn write(&self, credential: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = local_storage() else {
                leptos::logging::warn!("localStorage unavailable; credential not persisted");
                return;
            };
            if storage.set_item(&self.key, credential).is_err() {
                leptos::logging::warn!("failed to persist credential under {}", self.key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = credential;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}

/// In-memory credential slot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `credential` already persisted.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(credential.into())) }
    }
}

impl CredentialStorage for MemoryStorage {
    fn read(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn write(&self, credential: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(credential.to_owned());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}
