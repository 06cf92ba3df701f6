//! Command dispatcher - Routes prefixed messages to command plugins

use std::collections::HashMap;
use std::sync::Arc;
use crate::application::errors::{BotError, PluginError, PluginResult};
use crate::domain::entities::{CommandDescriptor, Event, Invocation, Response};
use crate::domain::traits::Bot;
use crate::plugins::trait_def::CommandPlugin;
use super::parser::CommandParser;

const NO_PERMISSION: &str = "No Permission to run this command!";
const LOOKUP_FAILED: &str = "Failed to lookup user permissions. Try command again.";

/// Maps trigger tokens to command plugins
pub struct CommandDispatcher {
    parser: CommandParser,
    triggers: HashMap<String, Arc<dyn CommandPlugin>>,
    commands: Vec<Arc<dyn CommandPlugin>>,
}

impl CommandDispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            parser: CommandParser::new(prefix),
            triggers: HashMap::new(),
            commands: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    /// Register a command plugin under all of its triggers
    pub fn register(&mut self, plugin: Arc<dyn CommandPlugin>) -> Result<(), BotError> {
        let desc = plugin.descriptor();
        if desc.triggers.is_empty() {
            return Err(BotError::Plugin(format!("Command '{}' has no triggers", desc.name())));
        }

        for trigger in &desc.triggers {
            if let Some(owner) = self.triggers.get(trigger) {
                return Err(BotError::Plugin(format!(
                    "Trigger '{}' of '{}' already registered by '{}'",
                    trigger,
                    desc.name(),
                    owner.descriptor().name()
                )));
            }
        }

        for trigger in &desc.triggers {
            self.triggers.insert(trigger.clone(), Arc::clone(&plugin));
        }
        tracing::debug!("Registered command '{}' ({})", desc.name(), desc.triggers.join(", "));
        self.commands.push(plugin);
        Ok(())
    }

    /// Find the plugin owning a trigger
    pub fn find(&self, trigger: &str) -> Option<&Arc<dyn CommandPlugin>> {
        self.triggers.get(trigger)
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.commands.iter().map(|c| c.descriptor().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Match a message event against the registered triggers
    pub fn match_event(&self, event: &Event) -> Option<(Invocation, Arc<dyn CommandPlugin>)> {
        let parsed = self.parser.parse(&event.text)?;
        let plugin = self.triggers.get(parsed.trigger)?;

        let invocation = Invocation {
            event: event.clone(),
            prefix: self.parser.prefix().to_string(),
            trigger: parsed.trigger.to_string(),
            args: parsed.args.to_string(),
        };
        Some((invocation, Arc::clone(plugin)))
    }

    /// Dispatch a message event.
    ///
    /// `Ok(None)` when the text is not a command for any registered plugin,
    /// or when the plugin produced nothing to post.
    pub async fn dispatch(&self, event: &Event, bot: &dyn Bot) -> PluginResult<Option<Response>> {
        let Some((invocation, plugin)) = self.match_event(event) else {
            return Ok(None);
        };
        let desc = plugin.descriptor();

        let mut response = Response::to(invocation.channel());
        if desc.dm_sender {
            response.channel = resolve_dm_channel(bot, invocation.user()).await;
        }

        if desc.admin_command {
            check_admin(bot, invocation.user()).await?;
        }

        tracing::info!(
            "{} invoked command '{}' with arguments '{}'",
            invocation.user(),
            invocation.trigger,
            invocation.args
        );
        plugin.on_command(&invocation, response)
    }
}

/// Channel to answer the sender privately.
///
/// Falls back to the bare user id when the DM cannot be opened; the platform
/// still delivers that, just not from the bot's own identity.
async fn resolve_dm_channel(bot: &dyn Bot, user_id: &str) -> String {
    match bot.open_direct_message(user_id).await {
        Ok(reply) => match reply.channel_id() {
            Some(channel) => channel.to_string(),
            None => {
                tracing::warn!(
                    "Opening DM with {} failed ({}), replying to user id",
                    user_id,
                    reply.error.as_deref().unwrap_or("unknown")
                );
                user_id.to_string()
            }
        },
        Err(e) => {
            tracing::warn!("Opening DM with {} failed ({}), replying to user id", user_id, e);
            user_id.to_string()
        }
    }
}

/// Deny unless the sender is a confirmed admin or owner
async fn check_admin(bot: &dyn Bot, user_id: &str) -> PluginResult<()> {
    let reply = match bot.user_info(user_id).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("User lookup for {} failed: {}", user_id, e);
            return Err(PluginError::Lookup(LOOKUP_FAILED.to_string()));
        }
    };

    match reply.profile() {
        Some(user) if user.is_privileged() => Ok(()),
        Some(_) => Err(PluginError::Permission(NO_PERMISSION.to_string())),
        None => {
            tracing::warn!(
                "User lookup for {} failed: {}",
                user_id,
                reply.error.as_deref().unwrap_or("unknown")
            );
            Err(PluginError::Lookup(LOOKUP_FAILED.to_string()))
        }
    }
}
