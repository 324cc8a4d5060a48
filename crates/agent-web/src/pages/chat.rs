//! Chat Page

use leptos::prelude::*;
use crate::api::{self, ChatMessage};
use crate::components::{MessageBubble, TraceStep};

#[component]
pub fn ChatPage() -> impl IntoView {
    let (messages, set_messages) = signal(Vec::<ChatMessage>::new());
    let (trace, set_trace) = signal(Vec::<ChatMessage>::new());
    let (iterations, set_iterations) = signal(None::<usize>);
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let send = move |()| {
        let msg = input.get().trim().to_string();
        if msg.is_empty() || loading.get() {
            return;
        }

        set_messages.update(|msgs| msgs.push(ChatMessage::new("user", msg.clone())));
        set_input.set(String::new());
        set_loading.set(true);

        leptos::task::spawn_local(async move {
            match api::send_chat(&msg).await {
                Ok(reply) => {
                    set_trace.update(|steps| steps.extend(reply.trace));
                    set_messages.update(|msgs| msgs.extend(reply.chat));
                    set_iterations.set(Some(reply.iterations));
                }
                Err(e) => {
                    set_messages.update(|msgs| msgs.push(ChatMessage::new("error", e)));
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="chat">
            <aside class="sidebar">
                <h2>"Agent Chain of Thought"</h2>
                <Show when=move || iterations.get().is_some()>
                    <p class="iterations">
                        {move || format!("Last query: {} iteration(s)", iterations.get().unwrap_or_default())}
                    </p>
                </Show>
                <div class="trace">
                    <For
                        each=move || trace.get().into_iter().enumerate()
                        key=|(i, _)| *i
                        children=move |(_, step)| view! { <TraceStep step=step /> }
                    />
                </div>
            </aside>

            <main class="chat-main">
                <div class="messages">
                    <For
                        each=move || messages.get().into_iter().enumerate()
                        key=|(i, _)| *i
                        children=move |(_, msg)| view! { <MessageBubble message=msg /> }
                    />
                    <Show when=move || loading.get()>
                        <div class="message loading">"Thinking..."</div>
                    </Show>
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Ask anything..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send(());
                            }
                        }
                    />
                    <button on:click=move |_| send(()) disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Send" }}
                    </button>
                </div>
            </main>
        </div>
    }
}
