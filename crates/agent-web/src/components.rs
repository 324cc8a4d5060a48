//! UI Components

use leptos::prelude::*;
use crate::api::ChatMessage;

/// Message bubble component
#[component]
pub fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let class = format!("message message-{}", message.role);

    view! {
        <div class=class>
            <span class="role">{message.role.clone()}</span>
            <p class="content">{message.content}</p>
        </div>
    }
}

/// Step label shown next to a trace entry
fn step_label(content: &str) -> &'static str {
    if content.contains("Final Answer:") {
        "answer"
    } else if content.starts_with("Observation:") {
        "observation"
    } else if content.contains("Action:") {
        "action"
    } else {
        "thought"
    }
}

/// One entry of the reasoning trace
#[component]
pub fn TraceStep(step: ChatMessage) -> impl IntoView {
    let label = step_label(&step.content);
    let class = format!("trace-step trace-{label}");

    view! {
        <div class=class>
            <span class="step-label">{label}</span>
            <pre class="step-content">{step.content}</pre>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_labels() {
        assert_eq!(step_label("Thought: add\nAction: calculator: {}\nPAUSE"), "action");
        assert_eq!(step_label("Observation: calculator tool output: 8"), "observation");
        assert_eq!(step_label("Thought: done\nFinal Answer: 8"), "answer");
        assert_eq!(step_label("Thought: hmm"), "thought");
    }
}
