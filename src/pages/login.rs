//! Login page: email + password exchange for a session credential.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::request::{RequestEnvelope, RequestError, use_api_client};
use crate::net::types::LoginRequest;
use crate::state::session::SessionHandle;
use crate::state::toast::{Notifier, ToastState};

const INVALID_EMAIL: &str = "Please enter a valid email address.";
const MISSING_PASSWORD: &str = "Password is required.";

/// Loose email shape check matching what a browser `type=email` input accepts.
pub(crate) fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
}

fn validate_login_input(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if !looks_like_email(email) {
        return Err(INVALID_EMAIL);
    }
    if password.is_empty() {
        return Err(MISSING_PASSWORD);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let config = expect_context::<Arc<ClientConfig>>();
    let api = use_api_client();
    let loading = *api.busy();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        let body = match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(body) => body,
            Err(message) => {
                toasts.error(message, &config.toast);
                return;
            }
        };

        let api = api.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let envelope = match RequestEnvelope::post().anonymous().json(&body) {
                Ok(envelope) => envelope.notify(&toasts),
                Err(e) => {
                    leptos::logging::error!("login request: {e}");
                    return;
                }
            };
            match api.fetch_data::<String>("/user/login", envelope).await {
                Ok(token) => {
                    session.login(&token);
                    navigate("/", NavigateOptions::default());
                }
                // Already surfaced through the notifier.
                Err(RequestError::Business { .. }) => {}
                Err(e) => leptos::logging::error!("Error while logging in: {e}"),
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-card__logo" aria-hidden="true"></div>
                <h2 class="login-card__title">"Welcome back"</h2>
                <form class="login-form" on:submit=on_submit novalidate=true>
                    <label class="field">
                        <span class="field__label">"Email"</span>
                        <input
                            class="field__input"
                            type="email"
                            required=true
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span class="field__label">"Password"</span>
                        <input
                            class="field__input"
                            type="password"
                            required=true
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <div class="login-form__actions">
                        <button class="button button--contained" type="submit" disabled=move || loading.get()>
                            {move || if loading.get() { "Logging in" } else { "Login" }}
                        </button>
                        <div class="login-form__links">
                            <A href="/register">"Create account"</A>
                        </div>
                    </div>
                </form>
            </div>
        </div>
    }
}
