//! Typed publish/subscribe channel for service notifications.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{unbounded, Receiver, Sender};
use shared::protocol::Notification;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Results of the named query changed.
    Query(String),
    SelectionSetUpdate,
}

impl Topic {
    pub fn matches(&self, notification: &Notification) -> bool {
        match (self, notification) {
            (Topic::Query(name), Notification::ResultsChanged { query_name }) => {
                name == query_name
            }
            (Topic::SelectionSetUpdate, Notification::SelectionSetUpdate) => true,
            _ => false,
        }
    }
}

struct Subscriber {
    topics: Vec<Topic>,
    tx: Sender<Notification>,
}

impl Subscriber {
    fn wants(&self, notification: &Notification) -> bool {
        self.topics.iter().any(|topic| topic.matches(notification))
    }
}

#[derive(Clone, Default)]
pub struct NotificationBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic) -> Subscription {
        self.subscribe_all(vec![topic])
    }

    /// One queue for several topics, so the receiver sees notifications in publish order.
    pub fn subscribe_all(&self, topics: Vec<Topic>) -> Subscription {
        let (tx, rx) = unbounded();
        self.lock().push(Subscriber {
            topics: topics.clone(),
            tx,
        });
        Subscription { topics, rx }
    }

    /// Delivers to every live subscriber of a matching topic and returns how many received it.
    pub fn publish(&self, notification: Notification) -> usize {
        let mut delivered = 0;
        self.lock().retain(|subscriber| {
            if !subscriber.wants(&notification) {
                return true;
            }
            match subscriber.tx.send(notification.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        tracing::trace!(?notification, delivered, "published notification");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receiving end of a topic subscription; dropping it unsubscribes on the next publish.
pub struct Subscription {
    topics: Vec<Topic>,
    rx: Receiver<Notification>,
}

impl Subscription {
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn try_next(&self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }
}
