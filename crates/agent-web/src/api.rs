//! API Client

use serde::{Deserialize, Serialize};

/// Chat message for display
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Reply to one query, split for the two panels
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
    #[serde(default)]
    pub trace: Vec<ChatMessage>,
    #[serde(default)]
    pub iterations: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn api_url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

/// Error text for a failed request
fn error_text(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| "Request failed".into())
}

/// Send a query to the agent
pub async fn send_chat(message: &str) -> Result<ChatReply, String> {
    let response = reqwest::Client::new()
        .post(api_url("/api/chat"))
        .json(&serde_json::json!({ "message": message }))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json::<ChatReply>().await.map_err(|e| e.to_string())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(error_text(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_shape() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"chat":[{"role":"assistant","content":"8"}],
                "trace":[{"role":"assistant","content":"Final Answer: 8"}],
                "iterations":1}"#,
        )
        .unwrap();
        assert_eq!(reply.chat, vec![ChatMessage::new("assistant", "8")]);
        assert_eq!(reply.trace.len(), 1);
        assert_eq!(reply.iterations, 1);
    }

    #[test]
    fn test_error_text() {
        assert_eq!(
            error_text(r#"{"error":"The agent is currently unavailable. Please try again.","code":"PROVIDER_UNAVAILABLE"}"#),
            "The agent is currently unavailable. Please try again."
        );
        assert_eq!(error_text("<html>bad gateway</html>"), "Request failed");
    }
}
