//! Observer registry - Per-category subscriber lists

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use crate::application::errors::{DispatchError, ObserverError};
use crate::domain::entities::{Category, Notification};

/// Observer function type
pub type Observer = Arc<dyn Fn(&Notification<'_>) -> ObserverResult + Send + Sync>;

/// Observer result
pub type ObserverResult = Result<(), ObserverError>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered observer lists keyed by category.
///
/// Not synchronized; callers that share it across tasks serialize access.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: HashMap<Category, Vec<(SubscriberId, Observer)>>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one category. Observers run in registration order.
    pub fn subscribe<F>(&mut self, category: Category, observer: F) -> SubscriberId
    where
        F: Fn(&Notification<'_>) -> ObserverResult + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let observer: Observer = Arc::new(observer);
        self.observers
            .entry(category)
            .or_default()
            .push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered for `category`.
    pub fn unsubscribe(&mut self, category: Category, id: SubscriberId) -> bool {
        let Some(list) = self.observers.get_mut(&category) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sid, _)| *sid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.observers.remove(&category);
        }
        removed
    }

    /// Deliver a notification to every observer of its category.
    ///
    /// Stops at the first failing observer; later observers are not called.
    pub fn notify(&self, notification: &Notification<'_>) -> Result<(), DispatchError> {
        let category = notification.category();
        let Some(list) = self.observers.get(&category) else {
            return Ok(());
        };

        for (id, observer) in list {
            tracing::trace!("Notifying {} of {}", id, category);
            observer(notification).map_err(|source| DispatchError::Observer {
                category,
                subscriber: *id,
                source,
            })?;
        }
        Ok(())
    }

    pub fn count(&self, category: Category) -> usize {
        self.observers.get(&category).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
