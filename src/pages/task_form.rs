//! Create-task form.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::request::{RequestEnvelope, use_api_client};
use crate::state::session::SessionHandle;
use crate::state::toast::{Notifier, ToastState};
use crate::util::task_form::{CHANGE_TYPES, TASK_KINDS, TaskDraft, toggle_choice};

/// Checkbox group backing a multi-select field of the draft.
fn choice_group(
    draft: RwSignal<TaskDraft>,
    label: &'static str,
    options: &'static [&'static str],
    pick: fn(&mut TaskDraft) -> &mut Vec<String>,
    read: fn(&TaskDraft) -> &Vec<String>,
) -> impl IntoView {
    view! {
        <fieldset class="field field--choices">
            <legend class="field__label">{label}</legend>
            {options
                .iter()
                .map(|&option| {
                    view! {
                        <label class="choice">
                            <input
                                type="checkbox"
                                prop:checked=move || draft.with(|d| read(d).iter().any(|v| v == option))
                                on:change=move |_| draft.update(|d| toggle_choice(pick(d), option))
                            />
                            {option}
                        </label>
                    }
                })
                .collect_view()}
        </fieldset>
    }
}

#[component]
pub fn TaskFormPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let config = expect_context::<Arc<ClientConfig>>();
    let api = use_api_client();
    let loading = *api.busy();
    let navigate = use_navigate();

    let draft = RwSignal::new(TaskDraft::default());
    let can_submit = move || draft.with(TaskDraft::is_valid) && !loading.get();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        let task = match draft.with_untracked(|d| d.to_new_task(session.subject_id())) {
            Ok(task) => task,
            Err(message) => {
                toasts.error(message, &config.toast);
                return;
            }
        };

        let api = api.clone();
        leptos::task::spawn_local(async move {
            let envelope = match RequestEnvelope::post().json(&task) {
                Ok(envelope) => envelope.notify(&toasts),
                Err(e) => {
                    leptos::logging::error!("create task request: {e}");
                    return;
                }
            };
            match api.fetch("/task/create", envelope).await {
                Ok(reply) if reply.success => draft.set(TaskDraft::default()),
                Ok(_) => {}
                Err(e) => leptos::logging::error!("Error while creating task: {e}"),
            }
        });
    };

    let on_cancel = move |_| {
        draft.set(TaskDraft::default());
        navigate("/tasks", NavigateOptions::default());
    };

    let text_field = move |label: &'static str,
                           placeholder: &'static str,
                           get: fn(&TaskDraft) -> String,
                           put: fn(&mut TaskDraft, String)| {
        view! {
            <label class="field">
                <span class="field__label">{label}</span>
                <input
                    class="field__input"
                    type="text"
                    placeholder=placeholder
                    prop:value=move || draft.with(get)
                    on:input=move |ev| draft.update(|d| put(d, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="task-form">
            <h2>"Create Task"</h2>
            <form
                class="task-form__grid"
                on:submit=on_submit
                on:keydown=|ev: leptos::ev::KeyboardEvent| {
                    let in_textarea = event_target::<leptos::web_sys::Element>(&ev).tag_name() == "TEXTAREA";
                    if ev.key() == "Enter" && !in_textarea {
                        ev.prevent_default();
                    }
                }
                novalidate=true
            >
                {text_field("Task Name", "", |d| d.task_name.clone(), |d, v| d.task_name = v)}
                {text_field(
                    "Task Number",
                    "e.g. 30978, 30979 (comma-separated)",
                    |d| d.task_number.clone(),
                    |d, v| d.task_number = v,
                )}
                {text_field(
                    "Bug Number",
                    "e.g. 454545, 009912 (comma-separated)",
                    |d| d.bug_number.clone(),
                    |d, v| d.bug_number = v,
                )}
                {choice_group(draft, "Type", &TASK_KINDS, |d| &mut d.kinds, |d| &d.kinds)}
                {text_field("Branch Name", "e.g. feature/login-fix", |d| d.branch_name.clone(), |d, v| d.branch_name = v)}
                {choice_group(draft, "Changes Type", &CHANGE_TYPES, |d| &mut d.changes, |d| &d.changes)}
                <label class="field field--wide">
                    <span class="field__label">"Description"</span>
                    <textarea
                        class="field__input"
                        rows="5"
                        placeholder="Optional: add details, links to PRs, steps to reproduce, etc."
                        prop:value=move || draft.with(|d| d.description.clone())
                        on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="task-form__actions">
                    <button class="button button--text button--error" type="button" on:click=on_cancel>
                        "Cancel"
                    </button>
                    <button class="button button--contained" type="submit" disabled=move || !can_submit()>
                        {move || if loading.get() { "Creating..." } else { "Create Task" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
