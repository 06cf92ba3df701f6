//! nimbus-bot - a plugin-based command bot for Slack

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

#[cfg(test)]
mod test_support;
