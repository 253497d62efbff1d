//! Message handling - Classification and observer dispatch

pub mod dispatcher;
pub mod observers;
pub mod registry;
pub mod rules;

pub use dispatcher::MessageDispatcher;
pub use registry::{Observer, ObserverRegistry, ObserverResult, SubscriberId};
pub use rules::{Rule, RULES};
