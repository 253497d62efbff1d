//! Domain layer - Core message model with no transport dependencies
//!
//! This layer contains:
//! - Entities: Message records, rooms, users, categories and notifications
//! - Traits: Abstractions for infrastructure (UpdateSource)

pub mod entities;
pub mod traits;
