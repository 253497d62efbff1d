//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Listener-specific errors
//! - Messaging: Classification rules, observer registry, dispatcher
//! - Services: Serialized relay in front of the dispatcher

pub mod errors;
pub mod services;
pub mod messaging;
