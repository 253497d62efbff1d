use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::application::errors::{BotError, DispatchError};
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{Category, MessageRecord};
use crate::domain::traits::UpdateSource;

/// Counters reported when the relay worker stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub dispatched: BTreeMap<Category, u64>,
    pub failures: u64,
}

impl RelayStats {
    pub fn total(&self) -> u64 {
        self.dispatched.values().sum()
    }

    pub fn count(&self, category: Category) -> u64 {
        self.dispatched.get(&category).copied().unwrap_or(0)
    }
}

/// Counters for one pass over an update source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub delivered: u64,
    pub skipped: u64,
    pub rejected: u64,
}

/// Cloneable sending side of the relay queue
#[derive(Clone)]
pub struct RelayHandle {
    sender: mpsc::Sender<MessageRecord>,
}

impl RelayHandle {
    /// Queue a record for classification. Waits while the queue is full.
    pub async fn deliver(&self, record: MessageRecord) -> Result<(), DispatchError> {
        self.sender.send(record).await.map_err(|_| DispatchError::Closed)
    }
}

/// Serializes deliveries from any number of tasks into one dispatcher.
///
/// The dispatcher lives on a single worker task fed by an mpsc queue, so
/// records are classified one at a time in arrival order. The worker ends
/// once every `RelayHandle` has been dropped.
pub struct RelayService;

impl RelayService {
    pub fn spawn(dispatcher: MessageDispatcher, capacity: usize) -> (RelayHandle, JoinHandle<RelayStats>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(Self::run_worker(dispatcher, receiver));
        (RelayHandle { sender }, worker)
    }

    async fn run_worker(dispatcher: MessageDispatcher, mut receiver: mpsc::Receiver<MessageRecord>) -> RelayStats {
        let mut stats = RelayStats::default();

        while let Some(record) = receiver.recv().await {
            match dispatcher.dispatch(&record) {
                Ok(category) => {
                    *stats.dispatched.entry(category).or_default() += 1;
                }
                Err(e) => {
                    // The message is not retried; move on to the next one.
                    tracing::error!("[{}] Dispatch failed: {}", record.room.id, e);
                    stats.failures += 1;
                }
            }
        }

        tracing::debug!("Relay worker stopped after {} messages", stats.total() + stats.failures);
        stats
    }

    /// Drain an update source into the relay.
    ///
    /// Updates without a message are skipped. Updates that fail to decode are
    /// logged and skipped; any other source error ends the pump.
    pub async fn pump<S>(source: &mut S, relay: &RelayHandle) -> Result<PumpStats, BotError>
    where
        S: UpdateSource + ?Sized,
    {
        let mut stats = PumpStats::default();

        loop {
            let update = match source.next_update().await {
                Ok(Some(update)) => update,
                Ok(None) => break,
                Err(BotError::Parse(reason)) => {
                    tracing::warn!("[{}] Rejected update: {}", source.name(), reason);
                    stats.rejected += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let update_id = update.update_id;
            match update.into_message() {
                Some(record) => {
                    relay.deliver(record).await?;
                    stats.delivered += 1;
                }
                None => {
                    tracing::debug!("[{}] Update {} carries no message", source.name(), update_id);
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use crate::application::errors::ObserverError;
    use crate::domain::entities::{Notification, Update, User};

    struct ScriptedSource {
        items: VecDeque<Result<Option<Update>, BotError>>,
    }

    #[async_trait]
    impl UpdateSource for ScriptedSource {
        async fn next_update(&mut self) -> Result<Option<Update>, BotError> {
            self.items.pop_front().unwrap_or(Ok(None))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn update(id: i64, message: Option<MessageRecord>) -> Result<Option<Update>, BotError> {
        Ok(Some(Update { update_id: id, message }))
    }

    #[tokio::test]
    async fn test_relay_preserves_order_across_tasks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = MessageDispatcher::new(1);
        let sink = seen.clone();
        dispatcher.subscribe(Category::TextMessage, move |n| {
            if let Notification::TextMessage { text, .. } = n {
                sink.lock().unwrap().push(text.to_string());
            }
            Ok(())
        });

        let (relay, worker) = RelayService::spawn(dispatcher, 4);
        let mut tasks = Vec::new();
        for task in 0..3 {
            let relay = relay.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..5 {
                    let record = MessageRecord::new(1).with_text(format!("{}-{}", task, i));
                    relay.deliver(record).await.unwrap();
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        drop(relay);

        let stats = worker.await.unwrap();
        assert_eq!(stats.count(Category::TextMessage), 15);
        assert_eq!(stats.failures, 0);

        // Per-producer order is kept.
        let seen = seen.lock().unwrap();
        for task in 0..3 {
            let prefix = format!("{}-", task);
            let mine: Vec<&String> = seen.iter().filter(|s| s.starts_with(&prefix)).collect();
            let expected: Vec<String> = (0..5).map(|i| format!("{}-{}", task, i)).collect();
            assert_eq!(mine, expected.iter().collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_worker_survives_observer_failure() {
        let mut dispatcher = MessageDispatcher::new(1);
        dispatcher.subscribe(Category::MemberJoined, |_| Err(ObserverError::new("nope")));

        let (relay, worker) = RelayService::spawn(dispatcher, 1);
        relay.deliver(MessageRecord::new(1).with_joined_member(User::new(2))).await.unwrap();
        relay.deliver(MessageRecord::new(1).with_text("still here")).await.unwrap();
        drop(relay);

        let stats = worker.await.unwrap();
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.count(Category::TextMessage), 1);
        assert_eq!(stats.total(), 1);
    }

    #[tokio::test]
    async fn test_deliver_after_worker_stopped() {
        let (relay, worker) = RelayService::spawn(MessageDispatcher::new(1), 1);
        worker.abort();
        let _ = worker.await;

        let result = relay.deliver(MessageRecord::new(1)).await;
        assert!(matches!(result, Err(DispatchError::Closed)));
    }

    #[tokio::test]
    async fn test_pump_skips_and_rejects() {
        let mut source = ScriptedSource {
            items: VecDeque::from(vec![
                update(1, Some(MessageRecord::new(1).with_text("a"))),
                update(2, None),
                Err(BotError::Parse("line 3: missing field `chat`".to_string())),
                update(4, Some(MessageRecord::new(2).with_text("b"))),
            ]),
        };

        let (relay, worker) = RelayService::spawn(MessageDispatcher::new(1), 8);
        let pumped = RelayService::pump(&mut source, &relay).await.unwrap();
        drop(relay);
        let stats = worker.await.unwrap();

        assert_eq!(pumped, PumpStats { delivered: 2, skipped: 1, rejected: 1 });
        assert_eq!(stats.count(Category::TextMessage), 1);
        assert_eq!(stats.count(Category::MismatchedRoom), 1);
    }

    #[tokio::test]
    async fn test_pump_stops_on_io_error() {
        let mut source = ScriptedSource {
            items: VecDeque::from(vec![
                Err(BotError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))),
                update(1, Some(MessageRecord::new(1))),
            ]),
        };

        let (relay, _worker) = RelayService::spawn(MessageDispatcher::new(1), 8);
        let result = RelayService::pump(&mut source, &relay).await;
        assert!(matches!(result, Err(BotError::Io(_))));
    }
}
