//! Domain entities - Core objects exchanged between the bot and its plugins

pub mod user;
pub mod event;
pub mod response;
pub mod command;

pub use user::UserProfile;
pub use event::{Event, Invocation, MESSAGE_EVENT};
pub use response::Response;
pub use command::{CommandDescriptor, PluginDescriptor};
