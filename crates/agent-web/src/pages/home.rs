//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"ReAct Agent"</h1>
                <p class="tagline">"An LLM that thinks, acts with tools and observes before it answers"</p>
                <div class="cta">
                    <a href="/chat" class="btn btn-primary">"Start Chatting"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"Reasoning you can read"</h3>
                    <p>"Every thought, action and observation is shown next to the answer."</p>
                </div>
                <div class="feature">
                    <h3>"Tools"</h3>
                    <p>"Calculator, Wikipedia and web search, called through plain-text actions."</p>
                </div>
                <div class="feature">
                    <h3>"Long conversations"</h3>
                    <p>"Older turns are folded into a running summary when history grows."</p>
                </div>
            </section>
        </div>
    }
}
