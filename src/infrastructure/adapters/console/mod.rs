//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use crate::application::errors::BotError;
use crate::domain::entities::{Event, Response, UserProfile};
use crate::domain::traits::{Bot, BotInfo, ImOpenReply, UserInfoReply};

/// User id of whoever types at the console
pub const CONSOLE_USER: &str = "console";
/// Channel the console user talks in
pub const CONSOLE_CHANNEL: &str = "console";
/// Direct message channel handed out by `open_direct_message`
pub const CONSOLE_DM: &str = "D-console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    admin: bool,
    transcript: Mutex<Vec<Response>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "nimbus".to_string(),
                name: "nimbus".to_string(),
            },
            admin: false,
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Make the console user a workspace admin
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Messages posted so far
    pub fn transcript(&self) -> Vec<Response> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Turn a typed line into a message event
    pub fn event_from_line(line: &str) -> Option<Event> {
        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            return None;
        }
        Some(Event::message(CONSOLE_USER, CONSOLE_CHANNEL, text))
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn listen(&self, tx: mpsc::Sender<Event>) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
        {
            let Some(event) = Self::event_from_line(&line) else {
                continue;
            };
            if tx.send(event).await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn open_direct_message(&self, _user_id: &str) -> Result<ImOpenReply, BotError> {
        Ok(ImOpenReply::opened(CONSOLE_DM))
    }

    async fn user_info(&self, user_id: &str) -> Result<UserInfoReply, BotError> {
        let mut user = UserProfile::new(user_id).with_name(user_id);
        user.is_admin = self.admin;
        Ok(UserInfoReply::found(user))
    }

    async fn post_message(&self, response: &Response) -> Result<(), BotError> {
        println!("[{}] {}", response.channel, response.text);
        self.transcript
            .lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?
            .push(response.clone());
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
