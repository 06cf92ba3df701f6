//! Help listing built from command descriptors

use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{CommandDescriptor, Invocation, Response};
use crate::plugins::trait_def::CommandPlugin;

/// `help` lists visible commands; `help <command>` shows details
pub struct HelpCommand {
    desc: CommandDescriptor,
    catalog: Vec<CommandDescriptor>,
}

impl HelpCommand {
    /// `catalog` holds the commands registered before help itself
    pub fn new(prefix: &str, catalog: Vec<CommandDescriptor>) -> Self {
        let desc = CommandDescriptor::new("help")
            .with_trigger("help")
            .with_short_help("Show available commands")
            .with_help("List every command, or show detailed help for one of them")
            .with_example(format!("{}help", prefix))
            .with_example(format!("{}help coin", prefix));

        let mut catalog: Vec<CommandDescriptor> =
            catalog.into_iter().filter(|c| !c.plugin.hidden).collect();
        catalog.push(desc.clone());

        Self { desc, catalog }
    }

    fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.catalog
            .iter()
            .find(|c| c.name() == name || c.matches(name))
    }

    fn overview(&self, prefix: &str) -> String {
        let mut text = "*Commands:*\n".to_string();
        for cmd in &self.catalog {
            let trigger = cmd.triggers.first().map(String::as_str).unwrap_or(cmd.name());
            text.push_str(&format!("`{}{}` - {}\n", prefix, trigger, cmd.plugin.short_help));
        }
        text.push_str(&format!("Use `{}help <command>` for details.", prefix));
        text
    }

    fn details(cmd: &CommandDescriptor, prefix: &str) -> String {
        let triggers: Vec<String> = cmd
            .triggers
            .iter()
            .map(|t| format!("`{}{}`", prefix, t))
            .collect();

        let mut text = format!("{}: {}", triggers.join(", "), cmd.plugin.help);
        if cmd.admin_command {
            text.push_str("\n_Admins only._");
        }
        if !cmd.plugin.help_examples.is_empty() {
            text.push_str("\n*Examples:*");
            for example in &cmd.plugin.help_examples {
                text.push_str(&format!("\n`{}`", example));
            }
        }
        text
    }
}

impl CommandPlugin for HelpCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.desc
    }

    fn on_command(&self, invocation: &Invocation, response: Response) -> PluginResult<Option<Response>> {
        let prefix = invocation.prefix.as_str();
        let wanted = invocation.args.trim();

        let text = if wanted.is_empty() {
            self.overview(prefix)
        } else {
            let name = wanted.strip_prefix(prefix).unwrap_or(wanted);
            let cmd = self.lookup(name).ok_or_else(|| {
                PluginError::validation(format!(
                    "No command named `{}`. Try `{}help`.",
                    name, prefix
                ))
            })?;
            Self::details(cmd, prefix)
        };

        Ok(Some(response.with_text(text).with_markdown()))
    }
}
