//! Prompt Templates
//!
//! Plain-text templates with `{name}` placeholders. The system template needs
//! `{tools}` and `{date}`, the summary template needs `{chats}`.

use std::path::Path;

use chrono::{DateTime, TimeZone};

use crate::error::{AgentError, Result};

pub const TOOLS_PLACEHOLDER: &str = "{tools}";
pub const DATE_PLACEHOLDER: &str = "{date}";
pub const CHATS_PLACEHOLDER: &str = "{chats}";

/// Timestamp format injected into the system prompt
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system_prompt.txt");
const DEFAULT_SUMMARY_PROMPT: &str = include_str!("../prompts/summary_prompt.txt");

/// A text template with `{placeholder}` slots
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Build a template, checking that every `required` placeholder occurs
    pub fn new(text: impl Into<String>, required: &[&str]) -> Result<Self> {
        let text = text.into();
        if let Some(missing) = required.iter().find(|p| !text.contains(**p)) {
            return Err(AgentError::Prompt(format!("template is missing {missing}")));
        }
        Ok(Self { text })
    }

    /// Load a template from a file
    pub fn load(path: impl AsRef<Path>, required: &[&str]) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Prompt(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::new(text, required)
    }

    /// Load a system prompt template (`{tools}`, `{date}`)
    pub fn system_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(path, &[TOOLS_PLACEHOLDER, DATE_PLACEHOLDER])
    }

    /// Load a summary prompt template (`{chats}`)
    pub fn summary_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(path, &[CHATS_PLACEHOLDER])
    }

    /// Built-in system prompt
    pub fn default_system() -> Self {
        Self { text: DEFAULT_SYSTEM_PROMPT.to_string() }
    }

    /// Built-in summary prompt
    pub fn default_summary() -> Self {
        Self { text: DEFAULT_SUMMARY_PROMPT.to_string() }
    }

    /// Substitute placeholders in one pass; values are never re-scanned
    /// and unknown placeholders are left as they are.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            rest = &rest[open..];
            match values.iter().find(|(key, _)| rest.starts_with(key)) {
                Some((key, value)) => {
                    out.push_str(value);
                    rest = &rest[key.len()..];
                }
                None => {
                    out.push('{');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Render the system prompt for one think cycle
pub fn render_system_prompt<Tz>(
    template: &PromptTemplate,
    tools: &str,
    now: &DateTime<Tz>,
    rolling_summary: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let date = now.format(DATE_FORMAT).to_string();
    let mut prompt = template.render(&[(TOOLS_PLACEHOLDER, tools), (DATE_PLACEHOLDER, &date)]);
    if !rolling_summary.is_empty() {
        prompt.push_str("\n\nOld messages summary:\n");
        prompt.push_str(rolling_summary);
    }
    prompt
}

/// Render the summarization prompt for a serialized message span
pub fn render_summary_prompt(template: &PromptTemplate, chats: &str) -> String {
    template.render(&[(CHATS_PLACEHOLDER, chats)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_defaults_have_placeholders() {
        let system = PromptTemplate::default_system();
        assert!(PromptTemplate::new(system.as_str(), &[TOOLS_PLACEHOLDER, DATE_PLACEHOLDER]).is_ok());
        let summary = PromptTemplate::default_summary();
        assert!(PromptTemplate::new(summary.as_str(), &[CHATS_PLACEHOLDER]).is_ok());
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let err = PromptTemplate::new("no slots here", &[CHATS_PLACEHOLDER]).unwrap_err();
        assert!(matches!(err, AgentError::Prompt(_)));
    }

    #[test]
    fn test_render_single_pass() {
        let t = PromptTemplate::new("tools={tools} date={date} json={\"a\":1}", &[]).unwrap();
        let out = t.render(&[(TOOLS_PLACEHOLDER, "x: {date}"), (DATE_PLACEHOLDER, "today")]);
        assert_eq!(out, "tools=x: {date} date=today json={\"a\":1}");
    }

    #[test]
    fn test_system_prompt_date_and_summary() {
        let t = PromptTemplate::new("{tools}|{date}", &[]).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();

        let plain = render_system_prompt(&t, "calculator: math", &now, "");
        assert_eq!(plain, "calculator: math|2025-03-09 14:05:07");

        let with_summary = render_system_prompt(&t, "calculator: math", &now, "User asked about Rust.");
        assert_eq!(
            with_summary,
            "calculator: math|2025-03-09 14:05:07\n\nOld messages summary:\nUser asked about Rust."
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = PromptTemplate::summary_from_file("/nonexistent/summary_prompt.txt").unwrap_err();
        assert!(matches!(err, AgentError::Prompt(_)));
    }
}
