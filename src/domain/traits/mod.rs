//! Domain traits - Abstractions for infrastructure implementations

pub mod source;

pub use source::UpdateSource;
