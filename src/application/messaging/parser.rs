//! Command parser - Splits prefixed message text into trigger and arguments

/// Trigger token and argument remainder of a prefixed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub trigger: &'a str,
    pub args: &'a str,
}

/// Recognizes command messages by their prefix
#[derive(Debug, Clone)]
pub struct CommandParser {
    command_prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse message text.
    ///
    /// Returns `None` when the text does not start with the prefix. The
    /// remainder is split on the first single space only, so the arguments
    /// keep any further spacing verbatim.
    pub fn parse<'a>(&self, text: &'a str) -> Option<ParsedCommand<'a>> {
        let rest = text.strip_prefix(self.command_prefix.as_str())?;

        let (trigger, args) = rest.split_once(' ').unwrap_or((rest, ""));
        Some(ParsedCommand { trigger, args })
    }
}
