//! Task list with a filter dialog.

#[cfg(test)]
#[path = "task_list_test.rs"]
mod task_list_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::spinner::Spinner;
use crate::config::ClientConfig;
use crate::net::request::{BrowserClient, RequestBody, RequestEnvelope, use_api_client};
use crate::net::types::{ApiEnvelope, Task};
use crate::state::session::SessionHandle;
use crate::state::toast::{Notifier, ToastOptions, ToastState};
use crate::util::task_form::{FILTER_KINDS, TaskFilters, TriState, as_csv, filter_payload, yes_no};

/// Tasks from a list reply; anything but a successful array is empty.
/// Rows that do not decode are skipped.
fn tasks_from_envelope(reply: &ApiEnvelope) -> Vec<Task> {
    if !reply.success {
        return Vec::new();
    }
    let Some(serde_json::Value::Array(rows)) = &reply.data else {
        return Vec::new();
    };
    rows.iter()
        .filter(|row| row.is_object())
        .filter_map(|row| match serde_json::from_value::<Task>(row.clone()) {
            Ok(task) => Some(task),
            Err(e) => {
                leptos::logging::warn!("skipping undecodable task row: {e}");
                None
            }
        })
        .collect()
}

fn load_tasks(
    api: &BrowserClient,
    session: SessionHandle,
    filters: RwSignal<TaskFilters>,
    tasks: RwSignal<Vec<Task>>,
    toasts: RwSignal<ToastState>,
    options: ToastOptions,
) {
    let api = api.clone();
    let payload = filter_payload(session.subject_id().as_ref(), &filters.get_untracked());
    leptos::task::spawn_local(async move {
        let envelope = RequestEnvelope::post().body(RequestBody::Json(payload)).notify(&toasts);
        match api.fetch("/task/list", envelope).await {
            Ok(reply) => tasks.set(tasks_from_envelope(&reply)),
            Err(e) => {
                leptos::logging::error!("task list: {e}");
                toasts.error("Failed to fetch tasks", &options);
            }
        }
    });
}

#[component]
pub fn TaskListPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let config = expect_context::<Arc<ClientConfig>>();
    let api = use_api_client();
    let loading = *api.busy();
    let navigate = use_navigate();

    let filters = RwSignal::new(TaskFilters::default());
    let tasks = RwSignal::new(Vec::<Task>::new());
    let show_filters = RwSignal::new(false);

    let initial_api = api.clone();
    let initial_options = config.toast.clone();
    Effect::new(move || {
        if session.subject_id().is_some() {
            load_tasks(&initial_api, session, filters, tasks, toasts, initial_options.clone());
        }
    });

    let apply_api = api.clone();
    let apply_options = config.toast.clone();
    let on_apply = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        load_tasks(&apply_api, session, filters, tasks, toasts, apply_options.clone());
        show_filters.set(false);
    };

    let on_reset = move |_| {
        filters.set(TaskFilters::default());
        tasks.set(Vec::new());
    };

    let on_new = move |_| navigate("/tasks/add", NavigateOptions::default());

    let text_filter = move |label: &'static str, get: fn(&TaskFilters) -> String, put: fn(&mut TaskFilters, String)| {
        view! {
            <label class="field">
                <span class="field__label">{label}</span>
                <input
                    class="field__input"
                    type="text"
                    prop:value=move || filters.with(get)
                    on:input=move |ev| filters.update(|f| put(f, event_target_value(&ev)))
                />
            </label>
        }
    };

    let tri_filter = move |label: &'static str, get: fn(&TaskFilters) -> TriState, put: fn(&mut TaskFilters, TriState)| {
        view! {
            <label class="field">
                <span class="field__label">{label}</span>
                <select
                    class="field__input"
                    prop:value=move || filters.with(get).as_select()
                    on:change=move |ev| filters.update(|f| put(f, TriState::from_select(&event_target_value(&ev))))
                >
                    <option value="">"All"</option>
                    <option value="true">"Yes"</option>
                    <option value="false">"No"</option>
                </select>
            </label>
        }
    };

    view! {
        <div class="task-list">
            <div class="task-list__header">
                <h2>"Tasks"</h2>
                <div class="task-list__actions">
                    <button class="button button--outlined" on:click=move |_| show_filters.set(true)>
                        "Filter"
                    </button>
                    <button class="button button--contained" on:click=on_new>
                        "New Task"
                    </button>
                </div>
            </div>

            <Show when=move || show_filters.get()>
                <div class="modal-backdrop">
                    <div class="modal">
                        <div class="modal__header">
                            <h3>"Filters"</h3>
                            <button class="modal__close" aria-label="Close" on:click=move |_| show_filters.set(false)>
                                "\u{00D7}"
                            </button>
                        </div>
                        <form class="filter-grid" on:submit=on_apply.clone()>
                            <label class="field">
                                <span class="field__label">"Type"</span>
                                <select
                                    class="field__input"
                                    prop:value=move || filters.with(|f| f.kind.clone())
                                    on:change=move |ev| filters.update(|f| f.kind = event_target_value(&ev))
                                >
                                    <option value="">"All types"</option>
                                    {FILTER_KINDS
                                        .into_iter()
                                        .map(|kind| view! { <option value=kind>{kind}</option> })
                                        .collect_view()}
                                </select>
                            </label>
                            {text_filter("Task Number", |f| f.task_number.clone(), |f, v| f.task_number = v)}
                            {text_filter("Bug Number", |f| f.bug_number.clone(), |f, v| f.bug_number = v)}
                            {text_filter("Task Name", |f| f.task_name.clone(), |f, v| f.task_name = v)}
                            {tri_filter("Merged", |f| f.is_merged, |f, v| f.is_merged = v)}
                            {tri_filter("Completed", |f| f.is_completed, |f, v| f.is_completed = v)}
                            <div class="filter-grid__actions">
                                <button class="button button--text button--error" type="button" on:click=on_reset>
                                    "Reset"
                                </button>
                                <button class="button button--contained" type="submit">
                                    "Apply"
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </Show>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner/> }>
                <div class="table-wrapper">
                    <table class="task-table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Task Name"</th>
                                <th>"Task #"</th>
                                <th>"Bug #"</th>
                                <th>"Type"</th>
                                <th>"Merged"</th>
                                <th>"Completed"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || tasks.get()
                                key=|task| task.id
                                children=move |task: Task| {
                                    let id = task.id;
                                    view! {
                                        <tr>
                                            <td>{task.id}</td>
                                            <td class="task-table__name">{task.task_name}</td>
                                            <td>{as_csv(&task.task_number)}</td>
                                            <td>{as_csv(&task.bug_number)}</td>
                                            <td>{as_csv(&task.kind)}</td>
                                            <td>{yes_no(task.is_merged.unwrap_or(false))}</td>
                                            <td>{yes_no(task.is_completed.unwrap_or(false))}</td>
                                            <td>
                                                <A
                                                    href=format!("/tasks/view/{id}")
                                                    attr:class="icon-button"
                                                    attr:title="View"
                                                >
                                                    "View"
                                                </A>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </Show>
        </div>
    }
}
