//! tg-listener - classifies chat messages and notifies per-category observers
//!
//! A transport hands each inbound message record to a `MessageDispatcher`,
//! which picks exactly one `Category` from a fixed, ordered rule table and
//! notifies the observers registered for it.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use application::errors::{BotError, ConfigError, DispatchError, ObserverError};
pub use application::messaging::{MessageDispatcher, SubscriberId};
pub use application::services::{RelayHandle, RelayService};
pub use domain::entities::{Category, Field, MessageRecord, Notification, RoomId};
