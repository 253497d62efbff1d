//! Application layer errors

use thiserror::Error;
use crate::application::messaging::SubscriberId;
use crate::domain::entities::Category;

/// General listener errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure raised by a subscriber while handling a notification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ObserverError {
    pub message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Dispatch errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Subscriber {subscriber} failed on {category}: {source}")]
    Observer {
        category: Category,
        subscriber: SubscriberId,
        #[source]
        source: ObserverError,
    },

    #[error("Relay worker is no longer running")]
    Closed,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
