use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use crate::domain::entities::{Event, Response, UserProfile};
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
///
/// `Err` means the call never produced a reply (transport or decoding
/// failure). A reply with `ok == false` is a platform-level refusal.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Forward incoming events to `tx` until the source is exhausted
    async fn listen(&self, tx: mpsc::Sender<Event>) -> Result<(), BotError>;

    /// Open (or reuse) a direct message channel with a user
    async fn open_direct_message(&self, user_id: &str) -> Result<ImOpenReply, BotError>;

    /// Look up a user's profile and privileges
    async fn user_info(&self, user_id: &str) -> Result<UserInfoReply, BotError>;

    /// Post a message
    async fn post_message(&self, response: &Response) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Channel reference inside API replies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelRef {
    pub id: String,
}

/// Reply of the direct-message open call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImOpenReply {
    pub ok: bool,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImOpenReply {
    pub fn opened(channel_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            channel: Some(ChannelRef { id: channel_id.into() }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            channel: None,
            error: Some(error.into()),
        }
    }

    /// Channel id, only when the platform reported success
    pub fn channel_id(&self) -> Option<&str> {
        if !self.ok {
            return None;
        }
        self.channel.as_ref().map(|c| c.id.as_str())
    }
}

/// Reply of the user-info lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserInfoReply {
    pub ok: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UserInfoReply {
    pub fn found(user: UserProfile) -> Self {
        Self {
            ok: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            user: None,
            error: Some(error.into()),
        }
    }

    /// Profile, only when the platform reported success
    pub fn profile(&self) -> Option<&UserProfile> {
        if !self.ok {
            return None;
        }
        self.user.as_ref()
    }
}

/// Bot information
#[derive(Debug, Clone, Default)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
