//! Account registration page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::request::{RequestEnvelope, use_api_client};
use crate::net::types::RegisterRequest;
use crate::pages::login::looks_like_email;
use crate::state::toast::{Notifier, ToastState};

const MISSING_NAME: &str = "Please enter full name.";
const INVALID_EMAIL: &str = "Please enter a valid email address.";
const MISSING_PASSWORD: &str = "Password is required.";

fn validate_register_input(full_name: &str, email: &str, password: &str) -> Result<RegisterRequest, &'static str> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(MISSING_NAME);
    }
    let email = email.trim();
    if !looks_like_email(email) {
        return Err(INVALID_EMAIL);
    }
    if password.is_empty() {
        return Err(MISSING_PASSWORD);
    }
    Ok(RegisterRequest { full_name: full_name.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();
    let config = expect_context::<Arc<ClientConfig>>();
    let api = use_api_client();
    let loading = *api.busy();
    let navigate = use_navigate();

    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        let body = match validate_register_input(
            &full_name.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
        ) {
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
                    leptos::logging::error!("register request: {e}");
                    return;
                }
            };
            match api.fetch("/user/register", envelope).await {
                Ok(reply) if reply.success => navigate("/login", NavigateOptions::default()),
                Ok(_) => {}
                Err(e) => leptos::logging::error!("Error while registering: {e}"),
            }
        });
    };

    let text_input = move |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <label class="field">
                <span class="field__label">{label}</span>
                <input
                    class="field__input"
                    type=kind
                    required=true
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="register-page">
            <div class="register-card">
                <h2 class="register-card__title">"Create an account"</h2>
                <form class="register-form" on:submit=on_submit novalidate=true>
                    {text_input("Full Name", "text", full_name)}
                    {text_input("Email", "email", email)}
                    {text_input("Password", "password", password)}
                    <div class="register-form__actions">
                        <button class="button button--contained" type="submit" disabled=move || loading.get()>
                            {move || if loading.get() { "Creating account" } else { "Register" }}
                        </button>
                        <A href="/login">"Already have an account?"</A>
                    </div>
                </form>
            </div>
        </div>
    }
}
