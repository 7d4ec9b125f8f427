//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{ParentRoute, Route, Router, Routes},
};

use crate::components::layout::RootLayout;
use crate::components::route_gate::ProtectedRoute;
use crate::components::toast_host::ToastHost;
use crate::config::ClientConfig;
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, register::RegisterPage, task_form::TaskFormPage,
    task_list::TaskListPage, task_view::TaskViewPage,
};
use crate::state::session::SessionHandle;
use crate::state::toast::ToastState;
use crate::util::storage::BrowserStorage;

/// Root application component.
///
/// Provides the configuration, session, and toast contexts, starts session
/// restoration, and sets up client-side routing. Everything under the empty
/// parent segment is behind `ProtectedRoute`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = Arc::new(ClientConfig::from_build_env());
    let session = SessionHandle::new(BrowserStorage::new(config.storage_key.clone()));
    let toasts = RwSignal::new(ToastState::default());

    leptos::logging::log!("api base {} ({:?} credentials)", config.api_base, config.credential_mode);

    provide_context(Arc::clone(&config));
    provide_context(session);
    provide_context(toasts);

    // Restore after mount so the first render observes the initializing state.
    Effect::new(move |restored: Option<()>| {
        if restored.is_none() {
            session.restore();
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/tasktracker-client.css"/>
        <Title text="Task Tracker"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <ParentRoute path=StaticSegment("") view=ProtectedRoute>
                    <ParentRoute path=StaticSegment("") view=RootLayout>
                        <Route path=StaticSegment("") view=DashboardPage/>
                        <Route path=(StaticSegment("tasks"), StaticSegment("add")) view=TaskFormPage/>
                        <Route
                            path=(StaticSegment("tasks"), StaticSegment("view"), ParamSegment("id"))
                            view=TaskViewPage
                        />
                        <Route path=StaticSegment("tasks") view=TaskListPage/>
                    </ParentRoute>
                </ParentRoute>
            </Routes>
        </Router>
        <ToastHost/>
    }
}
