//! Plugin trait definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::application::errors::PluginResult;
use crate::domain::entities::{CommandDescriptor, Event, Invocation, PluginDescriptor, Response};

/// Generic plugin, called for every event of its descriptor's event type.
///
/// Useful for behavior that is not triggered by a command, such as expanding
/// links. Return the response to post, or `None` to stay silent.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Help metadata and the event type to listen to
    fn descriptor(&self) -> &PluginDescriptor;

    /// Called on each matching event. `response` is addressed to the event's channel.
    async fn on_event(&self, _event: &Event, _response: Response) -> PluginResult<Option<Response>> {
        Ok(None)
    }
}

/// Command plugin, called when a message starts with the command prefix
/// followed by one of the descriptor's triggers.
///
/// Parsing, DM redirect and admin checks happen before `on_command` runs.
pub trait CommandPlugin: Send + Sync {
    /// Triggers, flags and help metadata
    fn descriptor(&self) -> &CommandDescriptor;

    /// Handle a matched command. `response` already points at the resolved
    /// destination channel.
    fn on_command(&self, invocation: &Invocation, response: Response) -> PluginResult<Option<Response>>;
}

/// Plugin loading options
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Plugin names to skip at registration
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Register the `help` command
    #[serde(default = "default_true")]
    pub help: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            help: true,
        }
    }
}

impl PluginConfig {
    pub fn is_disabled(&self, name: &str) -> bool {
        !self.enabled || self.disabled.iter().any(|d| d == name)
    }
}
