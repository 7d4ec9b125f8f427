//! Single dashboard metric tile.

use leptos::prelude::*;

#[component]
pub fn MetricsCard(#[prop(into)] title: String, #[prop(into)] count: Signal<i64>) -> impl IntoView {
    view! {
        <div class="metrics-card">
            <h5 class="metrics-card__title">{title}</h5>
            <p class="metrics-card__count">{move || count.get()}</p>
        </div>
    }
}
