//! Plugin system for nimbus-bot
//! 
//! Generic plugins react to platform events; command plugins react to
//! prefixed messages and are routed by trigger.

pub mod builtin;
pub mod manager;
pub mod trait_def;

pub use manager::{PluginInfo, PluginManager};
pub use trait_def::{CommandPlugin, Plugin, PluginConfig};
