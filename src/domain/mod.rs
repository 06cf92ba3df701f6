//! Domain layer - Core types with no platform dependencies
//! 
//! This layer contains:
//! - Entities: Events, invocations, responses, users and plugin descriptors
//! - Traits: Abstractions for the messaging platform (Bot)

pub mod entities;
pub mod traits;
