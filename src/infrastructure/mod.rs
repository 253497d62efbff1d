//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Update sources (console / JSON lines)

pub mod config;
pub mod adapters;
