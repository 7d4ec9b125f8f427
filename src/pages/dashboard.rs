//! Dashboard page with aggregate task metrics.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated landing route. Metrics are fetched once the session knows
//! the subject id; until then the tiles show zeros.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::metrics_card::MetricsCard;
use crate::components::spinner::Spinner;
use crate::net::request::{RequestEnvelope, use_api_client};
use crate::net::types::{ApiEnvelope, DashboardMetrics};
use crate::state::session::SessionHandle;
use crate::state::toast::ToastState;
use crate::util::credential::SubjectId;

fn metrics_endpoint(user_id: &SubjectId) -> String {
    format!("/dashboard/getDashboardMetrics/{user_id}")
}

/// Metrics from a reply, falling back to zeros when `data` is absent or
/// shaped unexpectedly.
fn metrics_from_envelope(reply: &ApiEnvelope) -> DashboardMetrics {
    reply
        .data
        .clone()
        .filter(serde_json::Value::is_object)
        .and_then(|data| serde_json::from_value(data).ok())
        .unwrap_or_default()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionHandle>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let api = use_api_client();
    let loading = *api.busy();
    let metrics = RwSignal::new(DashboardMetrics::default());

    Effect::new(move || {
        let Some(user_id) = session.subject_id() else {
            leptos::logging::warn!("dashboard: session has no subject id; skipping metrics");
            return;
        };
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let envelope = RequestEnvelope::get().notify(&toasts);
            match api.fetch(&metrics_endpoint(&user_id), envelope).await {
                Ok(reply) => metrics.set(metrics_from_envelope(&reply)),
                Err(e) => leptos::logging::error!("Error while fetching dashboard metrics: {e}"),
            }
        });
    });

    let tiles: [(&str, fn(&DashboardMetrics) -> i64); 5] = [
        ("Tasks Completed This Month", |m| m.tasks_completed_this_month),
        ("Not Merged", |m| m.not_merged_count),
        ("Completed Bugs", |m| m.completed_bug_count),
        ("Completed Tasks", |m| m.completed_task_count),
        ("In Progress", |m| m.in_progress_count),
    ];

    view! {
        <Show
            when=move || !loading.get()
            fallback=|| view! { <Spinner/> }
        >
            <div class="dashboard">
                {tiles
                    .into_iter()
                    .map(|(title, pick)| {
                        view! { <MetricsCard title=title count=move || metrics.with(pick)/> }
                    })
                    .collect_view()}
            </div>
        </Show>
    }
}
