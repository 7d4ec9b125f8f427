//! User-facing notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never render success/error messages themselves. Every request passes
//! a [`Notifier`] to the request client, and the app-level implementation
//! queues toasts in `ToastState` for the `ToastHost` component to render.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// Screen corner/edge a toast is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl ToastPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
        }
    }
}

/// Display options attached to a single notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastOptions {
    pub position: ToastPosition,
    /// Milliseconds before the toast dismisses itself. `0` keeps it until closed.
    pub auto_close_ms: u32,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self { position: ToastPosition::TopRight, auto_close_ms: 2000 }
    }
}

/// Sink for request outcome messages.
pub trait Notifier {
    fn success(&self, message: &str, options: &ToastOptions);
    fn error(&self, message: &str, options: &ToastOptions);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A queued notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    pub options: ToastOptions,
}

/// Visible toasts, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

impl ToastState {
    /// Queue a toast and return its id.
    pub fn push(&mut self, kind: ToastKind, message: &str, options: &ToastOptions) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.toasts.push(Toast { id: id.clone(), kind, message: message.to_owned(), options: options.clone() });
        id
    }

    /// Remove the toast with `id`. Returns whether one was removed.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }
}

fn enqueue(toasts: RwSignal<ToastState>, kind: ToastKind, message: &str, options: &ToastOptions) {
    let mut id = String::new();
    toasts.update(|s| id = s.push(kind, message, options));

    #[cfg(feature = "csr")]
    if options.auto_close_ms > 0 {
        let delay = options.auto_close_ms;
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(delay).await;
            toasts.update(|s| {
                s.dismiss(&id);
            });
        });
    }
    #[cfg(not(feature = "csr"))]
    let _ = id;
}

impl Notifier for RwSignal<ToastState> {
    fn success(&self, message: &str, options: &ToastOptions) {
        enqueue(*self, ToastKind::Success, message, options);
    }

    fn error(&self, message: &str, options: &ToastOptions) {
        enqueue(*self, ToastKind::Error, message, options);
    }
}
