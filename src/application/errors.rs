//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error: {method} returned {error}")]
    Api { method: String, error: String },

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by plugins, carrying a message meant for the requesting user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Malformed or out-of-range command arguments
    #[error("{0}")]
    Validation(String),

    /// Sender lacks the privilege the command requires
    #[error("{0}")]
    Permission(String),

    /// A platform lookup needed to authorize the command failed
    #[error("{0}")]
    Lookup(String),
}

/// Kind of a plugin error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginErrorKind {
    Validation,
    Permission,
    Lookup,
}

impl PluginError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PluginError::Validation(msg.into())
    }

    pub fn kind(&self) -> PluginErrorKind {
        match self {
            PluginError::Validation(_) => PluginErrorKind::Validation,
            PluginError::Permission(_) => PluginErrorKind::Permission,
            PluginError::Lookup(_) => PluginErrorKind::Lookup,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> &str {
        match self {
            PluginError::Validation(msg)
            | PluginError::Permission(msg)
            | PluginError::Lookup(msg) => msg,
        }
    }
}

/// Result type returned by plugin handlers
pub type PluginResult<T> = Result<T, PluginError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_error_displays_bare_message() {
        let err = PluginError::Permission("No Permission to run this command!".into());
        assert_eq!(err.to_string(), "No Permission to run this command!");
        assert_eq!(err.kind(), PluginErrorKind::Permission);
    }

    #[test]
    fn config_error_converts_into_bot_error() {
        let err: BotError = ConfigError::MissingField("slack.token".into()).into();
        assert_eq!(err.to_string(), "Configuration error: Missing required field: slack.token");
    }
}
