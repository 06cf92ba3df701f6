use serde::{Deserialize, Serialize};

/// Outgoing message, serialized as the body of `chat.postMessage`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Response {
    pub channel: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mrkdwn_in: Vec<String>,
    #[serde(default)]
    pub as_user: bool,
}

impl Response {
    /// Start a reply addressed to `channel`
    pub fn to(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            as_user: true,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Ask the platform to render markdown in the text field
    pub fn with_markdown(mut self) -> Self {
        if !self.mrkdwn_in.iter().any(|f| f == "text") {
            self.mrkdwn_in.push("text".to_string());
        }
        self
    }
}
