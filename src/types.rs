use serde::{Deserialize, Serialize};
use std::fmt;

/// The stages of a smoke run, in the order they happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Connect,
    ListTools,
    CallTool,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Connect => f.write_str("connect"),
            Step::ListTools => f.write_str("tool listing"),
            Step::CallTool => f.write_str("tool call"),
        }
    }
}

/// A single part of a tool result, as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The decoded result of a `tools/call` request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolOutput {
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Joins every text part, used to describe a failed tool call
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What a successful run observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// `name vX.Y.Z` of the server, when it introduced itself
    pub server: Option<String>,
    pub tools: Vec<String>,
    pub tool: String,
    /// The printed, possibly truncated, response text
    pub preview: String,
}

/// Returns at most `max_chars` characters of `text`, never splitting a
/// character.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
