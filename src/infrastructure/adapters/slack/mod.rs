//! Slack Web API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

use crate::application::errors::{BotError, ConfigError};
use crate::domain::entities::{Event, Response};
use crate::domain::traits::{Bot, BotInfo, ImOpenReply, UserInfoReply};

/// Slack Web API base URL
pub const API_BASE: &str = "https://slack.com/api";

/// Messages requested per `conversations.history` page
const HISTORY_PAGE_SIZE: &str = "100";
/// Pages followed per channel and poll
const MAX_HISTORY_PAGES: usize = 10;

/// One message from `conversations.history`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
    pub ts: String,
    #[serde(default)]
    pub subtype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryReply {
    ok: bool,
    #[serde(default)]
    messages: Vec<HistoryMessage>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

impl HistoryReply {
    /// Cursor of the next page, if Slack has one
    fn next_cursor(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.as_str())
            .filter(|c| !c.is_empty())
    }
}

impl HistoryMessage {
    fn into_event(self, channel: &str) -> Event {
        let mut event = Event::message(self.user.unwrap_or_default(), channel, self.text).with_ts(self.ts);
        if !self.kind.is_empty() {
            event.event_type = self.kind;
        }
        event.subtype = self.subtype;
        event
    }
}

/// Slack-style timestamp for the current time
fn now_ts() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[derive(Debug, Deserialize)]
struct PostReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack bot adapter
pub struct SlackAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
    channels: Vec<String>,
    poll_interval: Duration,
}

impl SlackAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            info: BotInfo {
                id: String::new(),
                name: "nimbus".to_string(),
            },
            channels: Vec::new(),
            poll_interval: Duration::from_secs(3),
        }
    }

    /// Point the adapter at another API host (used for testing)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Channels to poll for new messages
    pub fn with_channels(mut self, channels: Vec<String>, poll_interval: Duration) -> Self {
        self.channels = channels;
        self.poll_interval = poll_interval;
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    async fn decode<T: DeserializeOwned>(method: &str, response: reqwest::Response) -> Result<T, BotError> {
        if !response.status().is_success() {
            return Err(BotError::Network(format!("Slack {} failed: {}", method, response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("Slack {} reply: {}", method, e)))
    }

    async fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, &str)]) -> Result<T, BotError> {
        let response = self.client
            .get(self.api_url(method))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        Self::decode(method, response).await
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        Self::decode(method, response).await
    }

    /// Resolve the bot's own identity so its messages can be ignored
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct AuthReply {
            ok: bool,
            #[serde(default)]
            user_id: Option<String>,
            #[serde(default)]
            user: Option<String>,
            #[serde(default)]
            error: Option<String>,
        }

        let reply: AuthReply = self.get("auth.test", &[]).await?;
        if !reply.ok {
            return Err(BotError::Auth(reply.error.unwrap_or_else(|| "unknown".to_string())));
        }

        self.info = BotInfo {
            id: reply.user_id.unwrap_or_default(),
            name: reply.user.unwrap_or_else(|| self.info.name.clone()),
        };
        Ok(())
    }

    async fn history(&self, query: &[(&str, &str)]) -> Result<HistoryReply, BotError> {
        let reply: HistoryReply = self.get("conversations.history", query).await?;
        if !reply.ok {
            return Err(BotError::Api {
                method: "conversations.history".to_string(),
                error: reply.error.unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(reply)
    }

    /// Timestamp of the newest message in a channel, `None` when it is empty
    pub async fn latest_ts(&self, channel: &str) -> Result<Option<String>, BotError> {
        let reply = self.history(&[("channel", channel), ("limit", "1")]).await?;
        Ok(reply.messages.into_iter().next().map(|m| m.ts))
    }

    /// Fetch every message of one channel newer than `oldest`, oldest first
    pub async fn poll_channel(&self, channel: &str, oldest: &str) -> Result<Vec<Event>, BotError> {
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_HISTORY_PAGES {
            let mut query = vec![
                ("channel", channel),
                ("limit", HISTORY_PAGE_SIZE),
                ("oldest", oldest),
            ];
            if let Some(c) = cursor.as_deref() {
                query.push(("cursor", c));
            }

            let reply = self.history(&query).await?;
            cursor = reply.next_cursor().map(str::to_string);
            messages.extend(reply.messages);

            if cursor.is_none() {
                break;
            }
        }

        if cursor.is_some() {
            tracing::warn!(
                "Slack channel {} has more than {} pages of new messages, oldest ones skipped",
                channel,
                MAX_HISTORY_PAGES
            );
        }

        messages.retain(|m| m.ts.as_str() > oldest);
        messages.sort_by(|a, b| a.ts.cmp(&b.ts));
        Ok(messages.into_iter().map(|m| m.into_event(channel)).collect())
    }

    /// Poll every configured channel once.
    ///
    /// `positions` maps channel ids to the newest timestamp already seen. A
    /// channel without a position is only anchored at its newest message;
    /// nothing from it is returned until the next poll, so history is never
    /// replayed, even when the first attempt fails.
    pub async fn poll_once(&self, positions: &mut HashMap<String, String>) -> Vec<Event> {
        let mut events = Vec::new();

        for channel in &self.channels {
            let Some(oldest) = positions.get(channel).cloned() else {
                match self.latest_ts(channel).await {
                    Ok(ts) => {
                        positions.insert(channel.clone(), ts.unwrap_or_else(now_ts));
                    }
                    Err(e) => tracing::warn!("Slack poll of {} failed: {}", channel, e),
                }
                continue;
            };

            match self.poll_channel(channel, &oldest).await {
                Ok(new) => {
                    if let Some(ts) = new.last().and_then(|e| e.ts.clone()) {
                        positions.insert(channel.clone(), ts);
                    }
                    events.extend(new);
                }
                Err(e) => tracing::warn!("Slack poll of {} failed: {}", channel, e),
            }
        }

        events
    }
}

#[async_trait]
impl Bot for SlackAdapter {
    async fn listen(&self, tx: mpsc::Sender<Event>) -> Result<(), BotError> {
        if self.channels.is_empty() {
            return Err(ConfigError::MissingField("slack.channels".to_string()).into());
        }

        tracing::info!("Slack listening on {}", self.channels.join(", "));

        let mut positions: HashMap<String, String> = HashMap::new();
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;

            for event in self.poll_once(&mut positions).await {
                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    async fn open_direct_message(&self, user_id: &str) -> Result<ImOpenReply, BotError> {
        self.post("conversations.open", &serde_json::json!({ "users": user_id }))
            .await
    }

    async fn user_info(&self, user_id: &str) -> Result<UserInfoReply, BotError> {
        self.get("users.info", &[("user", user_id)]).await
    }

    async fn post_message(&self, response: &Response) -> Result<(), BotError> {
        tracing::debug!("Sending to {}: {}", response.channel, response.text);

        let body = serde_json::to_value(response).map_err(|e| BotError::Parse(e.to_string()))?;
        let reply: PostReply = self.post("chat.postMessage", &body).await?;

        if !reply.ok {
            return Err(BotError::Api {
                method: "chat.postMessage".to_string(),
                error: reply.error.unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
