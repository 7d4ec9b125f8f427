//! Read-only detail view of a single task.

#[cfg(test)]
#[path = "task_view_test.rs"]
mod task_view_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::spinner::Spinner;
use crate::net::request::{RequestEnvelope, use_api_client};
use crate::net::types::{ApiEnvelope, Task};
use crate::state::session::SessionHandle;
use crate::state::toast::ToastState;
use crate::util::credential::SubjectId;
use crate::util::task_form::{as_csv, yes_no};

const MISSING: &str = "\u{2014}";

fn task_endpoint(task_id: &str, user_id: &SubjectId) -> String {
    format!("/task/get/{task_id}/{user_id}")
}

/// The task from a detail reply; `None` unless the reply succeeded with a task.
fn task_from_envelope(reply: &ApiEnvelope) -> Option<Task> {
    if !reply.success {
        return None;
    }
    reply
        .data
        .clone()
        .filter(serde_json::Value::is_object)
        .and_then(|data| serde_json::from_value(data).ok())
}

fn or_missing(text: String) -> String {
    if text.trim().is_empty() { MISSING.to_owned() } else { text }
}

fn flag_label(flag: Option<bool>) -> &'static str {
    flag.map_or(MISSING, yes_no)
}

fn date_label(date: Option<&str>) -> String {
    or_missing(date.unwrap_or_default().to_owned())
}

fn detail(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="detail">
            <span class="detail__label">{label}</span>
            <span class="detail__value">{value}</span>
        </div>
    }
}

fn task_details(task: Task) -> impl IntoView {
    view! {
        <section class="detail-section">
            <h3>"Basic Information"</h3>
            <div class="detail-grid">
                {detail("Task Name", or_missing(task.task_name.clone()))}
                {detail("Type", or_missing(as_csv(&task.kind)))}
                {detail("Task Number", or_missing(as_csv(&task.task_number)))}
                {detail("Bug Number", or_missing(as_csv(&task.bug_number)))}
            </div>
        </section>
        <section class="detail-section">
            <h3>"Status"</h3>
            <div class="detail-grid">
                {detail("Branch", or_missing(as_csv(&task.branch_name)))}
                {detail("Merged", flag_label(task.is_merged).to_owned())}
                {detail("Completed", flag_label(task.is_completed).to_owned())}
                {detail("Published", flag_label(task.is_published).to_owned())}
            </div>
        </section>
        <section class="detail-section">
            <h3>"Timeline"</h3>
            <div class="detail-grid">
                {detail("Created", date_label(task.created_date.as_deref()))}
                {detail("Updated", date_label(task.updated_date.as_deref()))}
                {detail("Merged Date", date_label(task.merged_date.as_deref()))}
                {detail("Completed Date", date_label(task.completed_date.as_deref()))}
            </div>
        </section>
        <section class="detail-section">
            <h3>"Description"</h3>
            <div class="detail-description">{or_missing(task.description.unwrap_or_default())}</div>
        </section>
    }
}

#[component]
pub fn TaskViewPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let params = use_params_map();
    let api = use_api_client();
    let loading = *api.busy();
    let task = RwSignal::new(None::<Task>);

    Effect::new(move || {
        let Some(task_id) = params.with(|p| p.get("id")) else {
            return;
        };
        let Some(user_id) = session.subject_id() else {
            return;
        };
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let envelope = RequestEnvelope::get().notify(&toasts);
            match api.fetch(&task_endpoint(&task_id, &user_id), envelope).await {
                Ok(reply) => {
                    if let Some(found) = task_from_envelope(&reply) {
                        task.set(Some(found));
                    }
                }
                Err(e) => leptos::logging::error!("Error while fetching task {task_id}: {e}"),
            }
        });
    });

    view! {
        <div class="task-view">
            <div class="task-view__header">
                <h2>"Task Details"</h2>
                <A href="/tasks" attr:class="button button--outlined">"Back"</A>
            </div>
            <Show when=move || !loading.get() fallback=|| view! { <Spinner/> }>
                <div class="card">
                    {move || match task.get() {
                        Some(found) => task_details(found).into_any(),
                        None => view! { <p class="empty">"No data found."</p> }.into_any(),
                    }}
                </div>
            </Show>
        </div>
    }
}
