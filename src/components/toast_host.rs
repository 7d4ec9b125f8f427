//! Renders queued toasts grouped by screen position.

use leptos::prelude::*;

use crate::state::toast::{ToastKind, ToastState};

/// Toast overlay. Mounted once at the app root so every page, including the
/// unauthenticated ones, can surface request outcomes.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <div class="toast-host">
            <For
                each=move || toasts.get().toasts
                key=|toast| toast.id.clone()
                children=move |toast| {
                    let id = toast.id.clone();
                    let kind_class = match toast.kind {
                        ToastKind::Success => "toast toast--success",
                        ToastKind::Error => "toast toast--error",
                    };
                    let class = format!("{kind_class} toast--{}", toast.options.position.as_str());
                    let dismiss = move |_| {
                        toasts.update(|s| {
                            s.dismiss(&id);
                        });
                    };
                    view! {
                        <div class=class role="alert">
                            <span class="toast__message">{toast.message}</span>
                            <button class="toast__close" aria-label="Dismiss" on:click=dismiss>
                                "\u{00D7}"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
