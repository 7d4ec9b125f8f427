//! Client configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! A single `ClientConfig` is built at startup and provided through Leptos
//! context. Defaults match the local development backend; a handful of fields
//! can be overridden at build time through `TASKTRACKER_*` environment
//! variables since a WASM bundle has no runtime environment to read.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::state::toast::ToastOptions;

const DEFAULT_API_BASE: &str = "http://localhost:3005/api/v1";
const DEFAULT_STORAGE_KEY: &str = "token";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// How the request client proves identity to the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Rely on the browser's ambient cookie (`credentials: include`).
    #[default]
    Cookie,
    /// Read the persisted credential and send it as a bearer token.
    Header,
}

impl CredentialMode {
    /// Parse a mode name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cookie" => Some(Self::Cookie),
            "header" | "bearer" => Some(Self::Header),
            _ => None,
        }
    }
}

/// Application-wide client settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub api_base: String,
    /// `localStorage` key holding the credential.
    pub storage_key: String,
    /// Route the gate redirects unauthenticated visitors to.
    pub login_path: String,
    pub credential_mode: CredentialMode,
    /// Display options passed to every notification.
    pub toast: ToastOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            credential_mode: CredentialMode::default(),
            toast: ToastOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with any `TASKTRACKER_*` values captured at build time.
    pub fn from_build_env() -> Self {
        Self::default().with_overrides(
            option_env!("TASKTRACKER_API_BASE"),
            option_env!("TASKTRACKER_CREDENTIAL_MODE"),
            option_env!("TASKTRACKER_STORAGE_KEY"),
        )
    }

    /// Apply optional overrides. Blank values and unknown modes are ignored.
    pub fn with_overrides(mut self, api_base: Option<&str>, credential_mode: Option<&str>, storage_key: Option<&str>) -> Self {
        if let Some(base) = api_base.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_base = base.trim_end_matches('/').to_owned();
        }
        if let Some(raw) = credential_mode {
            match CredentialMode::parse(raw) {
                Some(mode) => self.credential_mode = mode,
                None => leptos::logging::warn!("ignoring unknown credential mode {raw:?}"),
            }
        }
        if let Some(key) = storage_key.map(str::trim).filter(|s| !s.is_empty()) {
            self.storage_key = key.to_owned();
        }
        self
    }

    /// Full URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}
