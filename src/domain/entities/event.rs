use serde::{Deserialize, Serialize};

/// Event type of ordinary channel messages
pub const MESSAGE_EVENT: &str = "message";

/// An incoming platform event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Event {
    #[serde(rename = "type", default = "default_event_type")]
    pub event_type: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

fn default_event_type() -> String {
    MESSAGE_EVENT.to_string()
}

impl Event {
    /// Create a plain message event
    pub fn message(
        user: impl Into<String>,
        channel: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            event_type: default_event_type(),
            user: user.into(),
            channel: channel.into(),
            text: text.into(),
            ts: None,
            subtype: None,
        }
    }

    pub fn with_ts(mut self, ts: impl Into<String>) -> Self {
        self.ts = Some(ts.into());
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn is_message(&self) -> bool {
        self.event_type == MESSAGE_EVENT
    }
}

/// A message that matched a registered command trigger.
///
/// `args` holds only what followed the trigger; the prefix and the trigger
/// itself are never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub event: Event,
    pub prefix: String,
    pub trigger: String,
    pub args: String,
}

impl Invocation {
    pub fn user(&self) -> &str {
        &self.event.user
    }

    pub fn channel(&self) -> &str {
        &self.event.channel
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}
