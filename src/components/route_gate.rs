//! Admission control for the protected part of the route tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every authenticated route. Nothing renders until session restoration
//! resolves, so a returning user with a valid credential is never bounced to
//! the login page. Once resolved, the decision re-runs on every session change
//! so a logout from any page redirects immediately.

#[cfg(test)]
#[path = "route_gate_test.rs"]
mod route_gate_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Outlet;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::state::session::{SessionHandle, SessionState};

/// What the gate does for a given session snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Restoration pending; render nothing and do not navigate.
    Suspend,
    Admit,
    /// Send the visitor to the login route, replacing history.
    Redirect,
}

pub fn gate_decision(state: &SessionState) -> GateDecision {
    if state.initializing() {
        GateDecision::Suspend
    } else if state.authenticated() {
        GateDecision::Admit
    } else {
        GateDecision::Redirect
    }
}

/// Navigation options for the login redirect: replace the stale protected URL.
pub fn redirect_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Gate decision that tracks every change to the session.
pub fn watch_gate(state: ReadSignal<SessionState>) -> Memo<GateDecision> {
    Memo::new(move |_| state.with(gate_decision))
}

/// Act on one decision. Returns whether a redirect was issued.
pub fn follow_gate_decision<F>(decision: GateDecision, login_path: &str, navigate: &F) -> bool
where
    F: Fn(&str, NavigateOptions),
{
    if decision != GateDecision::Redirect {
        return false;
    }
    navigate(login_path, redirect_options());
    true
}

/// Navigate to `login_path` whenever `decision` becomes `Redirect`.
pub fn install_gate_redirect<F>(decision: Memo<GateDecision>, login_path: String, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        follow_gate_decision(decision.get(), &login_path, &navigate);
    });
}

/// Parent route that only renders its children for an authenticated session.
#[component]
pub fn ProtectedRoute() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let config = expect_context::<Arc<ClientConfig>>();
    let navigate = use_navigate();

    let decision = watch_gate(session.state());
    install_gate_redirect(decision, config.login_path.clone(), navigate);

    move || match decision.get() {
        GateDecision::Admit => view! { <Outlet/> }.into_any(),
        GateDecision::Suspend | GateDecision::Redirect => ().into_any(),
    }
}
