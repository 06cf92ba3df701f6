//! In-memory platform used by unit tests

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;
use crate::application::errors::BotError;
use crate::domain::entities::{Event, Response};
use crate::domain::traits::{Bot, BotInfo, ImOpenReply, UserInfoReply};

/// Scripted `Bot` that records every call
#[derive(Default)]
pub struct MockBot {
    dm_reply: ImOpenReply,
    user_reply: UserInfoReply,
    transport_down: bool,
    fail_posts: bool,
    events: Vec<Event>,
    dm_requests: Mutex<Vec<String>>,
    user_requests: Mutex<Vec<String>>,
    posted: Mutex<Vec<Response>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            dm_reply: ImOpenReply::failed("not_scripted"),
            user_reply: UserInfoReply::failed("not_scripted"),
            ..Self::default()
        }
    }

    pub fn with_dm(mut self, reply: ImOpenReply) -> Self {
        self.dm_reply = reply;
        self
    }

    pub fn with_user(mut self, reply: UserInfoReply) -> Self {
        self.user_reply = reply;
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    /// Every API call fails before reaching the platform
    pub fn failing_transport(mut self) -> Self {
        self.transport_down = true;
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    pub fn dm_requests(&self) -> Vec<String> {
        self.dm_requests.lock().unwrap().clone()
    }

    pub fn user_requests(&self) -> Vec<String> {
        self.user_requests.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<Response> {
        self.posted.lock().unwrap().clone()
    }

    /// Lookups made on behalf of the dispatcher
    pub fn api_calls(&self) -> usize {
        self.dm_requests.lock().unwrap().len() + self.user_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn listen(&self, tx: mpsc::Sender<Event>) -> Result<(), BotError> {
        for event in &self.events {
            if tx.send(event.clone()).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn open_direct_message(&self, user_id: &str) -> Result<ImOpenReply, BotError> {
        self.dm_requests.lock().unwrap().push(user_id.to_string());
        if self.transport_down {
            return Err(BotError::Network("connection refused".to_string()));
        }
        Ok(self.dm_reply.clone())
    }

    async fn user_info(&self, user_id: &str) -> Result<UserInfoReply, BotError> {
        self.user_requests.lock().unwrap().push(user_id.to_string());
        if self.transport_down {
            return Err(BotError::Network("connection refused".to_string()));
        }
        Ok(self.user_reply.clone())
    }

    async fn post_message(&self, response: &Response) -> Result<(), BotError> {
        if self.transport_down || self.fail_posts {
            return Err(BotError::Network("connection refused".to_string()));
        }
        self.posted.lock().unwrap().push(response.clone());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "UBOT".to_string(),
            name: "nimbus".to_string(),
        }
    }
}
