//! Hook envelopes: the JSON exchanged with the host agent over stdio.
//!
//! The host writes one trigger event to stdin and reads at most one output
//! object from stdout.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Event name for the per-turn injection hook.
pub const USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";

/// Event name for the once-per-session health hook.
pub const SESSION_START: &str = "SessionStart";

/// A trigger event read from stdin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

impl HookInput {
    /// Parse a trigger event. Anything but a JSON object is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Input("empty stdin".into()));
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }

    /// The event name to echo back, defaulting to `UserPromptSubmit`.
    pub fn event_name(&self) -> &str {
        self.hook_event_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(USER_PROMPT_SUBMIT)
    }
}

/// The single object a hook prints to stdout.
#[derive(Debug, Clone, Serialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

impl HookOutput {
    pub fn new(event_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: event_name.into(),
                additional_context: context.into(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
