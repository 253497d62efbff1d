//! Message dispatcher - Classifies records and notifies subscribers

use crate::application::errors::DispatchError;
use crate::domain::entities::{Category, MessageRecord, Notification, RoomId};
use super::registry::{ObserverRegistry, ObserverResult, SubscriberId};
use super::rules;

/// Classifies each record into exactly one category and raises exactly one
/// notification for it.
///
/// The expected room is fixed at construction. The dispatcher keeps no
/// per-message state and has no internal locking: it expects at most one
/// `dispatch` in flight, see `RelayService` for a serialized front end.
pub struct MessageDispatcher {
    expected_room: RoomId,
    registry: ObserverRegistry,
}

impl MessageDispatcher {
    pub fn new(expected_room: impl Into<RoomId>) -> Self {
        Self {
            expected_room: expected_room.into(),
            registry: ObserverRegistry::new(),
        }
    }

    pub fn expected_room(&self) -> &RoomId {
        &self.expected_room
    }

    /// Register an observer for a category
    pub fn subscribe<F>(&mut self, category: Category, observer: F) -> SubscriberId
    where
        F: Fn(&Notification<'_>) -> ObserverResult + Send + Sync + 'static,
    {
        self.registry.subscribe(category, observer)
    }

    /// Register the same observer for every category
    pub fn subscribe_all<F>(&mut self, observer: F) -> Vec<(Category, SubscriberId)>
    where
        F: Fn(&Notification<'_>) -> ObserverResult + Clone + Send + Sync + 'static,
    {
        Category::ALL
            .iter()
            .map(|&category| (category, self.registry.subscribe(category, observer.clone())))
            .collect()
    }

    pub fn unsubscribe(&mut self, category: Category, id: SubscriberId) -> bool {
        self.registry.unsubscribe(category, id)
    }

    pub fn subscriber_count(&self, category: Category) -> usize {
        self.registry.count(category)
    }

    /// Classify without notifying anyone
    pub fn classify<'a>(&self, record: &'a MessageRecord) -> Notification<'a> {
        rules::classify(&self.expected_room, record)
    }

    /// Classify a record and notify the observers of its category.
    ///
    /// Returns the category raised, or the first observer failure.
    pub fn dispatch(&self, record: &MessageRecord) -> Result<Category, DispatchError> {
        let notification = self.classify(record);
        let category = notification.category();

        tracing::debug!(
            "[{}] {} -> {} ({} subscribers)",
            record.room.id,
            record.message_id().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            category,
            self.registry.count(category)
        );

        self.registry.notify(&notification)?;
        Ok(category)
    }
}
