//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{ChatPage, HomePage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <nav class="topbar">
                <A href="/">"ReAct Agent"</A>
                <A href="/chat">"Chat"</A>
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/chat") view=ChatPage />
                </Routes>
            </main>
        </Router>
    }
}
