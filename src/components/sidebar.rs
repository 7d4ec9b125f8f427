//! Side navigation for authenticated pages.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::session::SessionHandle;

const NAV_ITEMS: [(&str, &str); 2] = [("/", "Dashboard"), ("/tasks", "Tasks")];

/// Sidebar with primary navigation and a logout action.
///
/// Logging out only clears the session; the route gate notices and performs
/// the redirect.
#[component]
pub fn Sidebar() -> impl IntoView {
    let session = expect_context::<SessionHandle>();

    let on_logout = move |_| session.logout();

    view! {
        <aside class="sidenav">
            <h2 class="sidenav__title">"Task Tracker"</h2>
            <nav>
                <ul>
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(href, label)| {
                            view! {
                                <li>
                                    <A href=href attr:class="sidenav__link">
                                        <span class="sidenav__text">{label}</span>
                                    </A>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
            <button class="sidenav__logout" on:click=on_logout>
                "Log out"
            </button>
        </aside>
    }
}
