//! Shell for authenticated pages: sidebar plus routed content.

use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::components::sidebar::Sidebar;

#[component]
pub fn RootLayout() -> impl IntoView {
    view! {
        <div class="app-layout">
            <Sidebar/>
            <main class="app-layout__main">
                <Outlet/>
            </main>
        </div>
    }
}
