//! Adapters - Transport-side update sources

pub mod console;

pub use console::JsonLinesSource;
