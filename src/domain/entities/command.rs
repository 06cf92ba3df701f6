use super::event::MESSAGE_EVENT;

/// Help metadata shared by every plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
    /// Shows up in the `help` listing
    pub short_help: String,
    /// Shows up in `help <command>`
    pub help: String,
    pub help_examples: Vec<String>,
    /// Platform event type to listen to
    pub event_type: String,
    /// Hidden plugins are left out of the `help` listing
    pub hidden: bool,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_help: String::new(),
            help: String::new(),
            help_examples: Vec::new(),
            event_type: MESSAGE_EVENT.to_string(),
            hidden: true,
        }
    }

    pub fn with_short_help(mut self, text: impl Into<String>) -> Self {
        self.short_help = text.into();
        self
    }

    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.help_examples.push(example.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn visible(mut self) -> Self {
        self.hidden = false;
        self
    }
}

/// Static configuration of a command plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub plugin: PluginDescriptor,
    pub triggers: Vec<String>,
    /// Send the response to the sender as a direct message
    pub dm_sender: bool,
    /// Only workspace admins and owners may run the command
    pub admin_command: bool,
}

impl CommandDescriptor {
    /// Commands show up in `help` unless marked hidden
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            plugin: PluginDescriptor::new(name).visible(),
            triggers: Vec::new(),
            dm_sender: false,
            admin_command: false,
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.triggers.push(trigger.into());
        self
    }

    pub fn with_short_help(mut self, text: impl Into<String>) -> Self {
        self.plugin = self.plugin.with_short_help(text);
        self
    }

    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.plugin = self.plugin.with_help(text);
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.plugin = self.plugin.with_example(example);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.plugin.hidden = true;
        self
    }

    pub fn dm_sender(mut self) -> Self {
        self.dm_sender = true;
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.admin_command = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.plugin.name
    }

    /// Triggers are case sensitive
    pub fn matches(&self, token: &str) -> bool {
        self.triggers.iter().any(|t| t == token)
    }
}
