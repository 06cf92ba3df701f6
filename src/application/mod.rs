//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: The host bot event loop
//! - Errors: Bot, plugin and configuration errors
//! - Messaging: Command parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
