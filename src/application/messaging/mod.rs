//! Message handling - Command parsing and dispatching

pub mod dispatcher;
pub mod parser;

pub use dispatcher::CommandDispatcher;
pub use parser::{CommandParser, ParsedCommand};
