//! Plugin manager - holds registered plugins and routes events to them

use crate::application::errors::{BotError, PluginResult};
use crate::application::messaging::CommandDispatcher;
use crate::domain::entities::{Event, Response};
use crate::domain::traits::Bot;
use crate::plugins::builtin::{Ball8, CoinFlip, HelpCommand};
use crate::plugins::trait_def::{CommandPlugin, Plugin, PluginConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Manages all plugins for the bot
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
    dispatcher: CommandDispatcher,
    config: PluginConfig,
}

impl PluginManager {
    /// Create a new plugin manager for a command prefix
    pub fn new(prefix: impl Into<String>, config: PluginConfig) -> Self {
        Self {
            plugins: Vec::new(),
            dispatcher: CommandDispatcher::new(prefix),
            config,
        }
    }

    /// Register a generic plugin. Returns `false` when disabled by config.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<bool, BotError> {
        let name = plugin.descriptor().name.clone();

        if self.config.is_disabled(&name) {
            info!("Skipping disabled plugin: {}", name);
            return Ok(false);
        }
        if self.has_plugin(&name) {
            return Err(BotError::Plugin(format!("Plugin '{}' already registered", name)));
        }

        info!("Registering plugin: {}", name);
        self.plugins.push(Arc::new(plugin));
        Ok(true)
    }

    /// Register a command plugin. Returns `false` when disabled by config.
    pub fn register_command<P: CommandPlugin + 'static>(&mut self, plugin: P) -> Result<bool, BotError> {
        let name = plugin.descriptor().name().to_string();

        if self.config.is_disabled(&name) {
            info!("Skipping disabled command: {}", name);
            return Ok(false);
        }
        if self.has_plugin(&name) {
            return Err(BotError::Plugin(format!("Plugin '{}' already registered", name)));
        }

        info!("Registering command: {}", name);
        self.dispatcher.register(Arc::new(plugin))?;
        Ok(true)
    }

    /// Register the bundled commands, then `help` over everything registered so far
    pub fn register_builtin(&mut self) -> Result<(), BotError> {
        let prefix = self.dispatcher.prefix().to_string();
        self.register_command(Ball8::new(&prefix))?;
        self.register_command(CoinFlip::new(&prefix))?;
        if self.config.help {
            self.install_help()?;
        }
        Ok(())
    }

    /// Register `help` with a catalog of the commands currently registered
    pub fn install_help(&mut self) -> Result<bool, BotError> {
        let prefix = self.dispatcher.prefix().to_string();
        let help = HelpCommand::new(&prefix, self.dispatcher.descriptors());
        self.register_command(help)
    }

    /// Run an event through every matching plugin.
    ///
    /// Generic plugins see events of their configured type; the command
    /// dispatcher sees message events. One plugin failing does not stop the
    /// others.
    pub async fn handle_event(&self, event: &Event, bot: &dyn Bot) -> Vec<PluginResult<Response>> {
        let mut outcomes = Vec::new();

        for plugin in &self.plugins {
            if plugin.descriptor().event_type != event.event_type {
                continue;
            }
            match plugin.on_event(event, Response::to(&event.channel)).await {
                Ok(Some(response)) => outcomes.push(Ok(response)),
                Ok(None) => {}
                Err(e) => outcomes.push(Err(e)),
            }
        }

        if event.is_message() {
            match self.dispatcher.dispatch(event, bot).await {
                Ok(Some(response)) => outcomes.push(Ok(response)),
                Ok(None) => debug!("No command matched"),
                Err(e) => outcomes.push(Err(e)),
            }
        }

        outcomes
    }

    /// List all registered plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        let generic = self.plugins.iter().map(|p| {
            let desc = p.descriptor();
            PluginInfo {
                name: desc.name.clone(),
                description: desc.short_help.clone(),
                triggers: Vec::new(),
                hidden: desc.hidden,
            }
        });
        let commands = self.dispatcher.descriptors().into_iter().map(|c| PluginInfo {
            name: c.plugin.name,
            description: c.plugin.short_help,
            triggers: c.triggers,
            hidden: c.plugin.hidden,
        });
        generic.chain(commands).collect()
    }

    /// Check if a plugin exists
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.descriptor().name == name)
            || self.dispatcher.descriptors().iter().any(|c| c.name() == name)
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
    pub hidden: bool,
}
