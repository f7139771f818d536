//! Domain event bus.
//!
//! Mutations publish a [`DomainEvent`] describing which resource changed.
//! Subscribers (the SSE endpoint, dashboards) receive them over a tokio
//! broadcast channel. Publishing never blocks and never fails: events for
//! which no subscriber exists are dropped.

use serde::Serialize;
use tokio::sync::broadcast;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// The kind of resource an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Announcement,
    Level,
    Badge,
    LearningModule,
    Lesson,
    Faq,
    Feedback,
}

impl ResourceKind {
    /// Stable string name used in event payloads and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Announcement => "announcement",
            Self::Level => "level",
            Self::Badge => "badge",
            Self::LearningModule => "learning_module",
            Self::Lesson => "lesson",
            Self::Faq => "faq",
            Self::Feedback => "feedback",
        }
    }
}

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
    /// A single boolean flag was flipped (pin, publish, verify, ...).
    Toggled,
}

/// A change notification for a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct DomainEvent {
    /// Which resource type changed.
    pub resource: ResourceKind,
    /// ID of the changed record.
    pub resource_id: String,
    /// What happened.
    pub action: EventAction,
}

/// Broadcast bus for [`DomainEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Publish an event. Silently drops the event when nobody is listening.
    pub fn publish(&self, resource: ResourceKind, resource_id: &str, action: EventAction) {
        let event = DomainEvent {
            resource,
            resource_id: resource_id.to_string(),
            action,
        };

        tracing::debug!(
            resource = resource.as_str(),
            resource_id,
            ?action,
            "publishing domain event"
        );

        // SendError only means there are no active receivers.
        let _ = self.tx.send(event);
    }

    /// Subscribe to the event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(ResourceKind::User, "user1", EventAction::Created);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, ResourceKind::User);
        assert_eq!(event.resource_id, "user1");
        assert_eq!(event.action, EventAction::Created);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(ResourceKind::Faq, "faq1", EventAction::Deleted);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ResourceKind::Announcement, "ann1", EventAction::Updated);

        assert_eq!(rx1.recv().await.unwrap().resource_id, "ann1");
        assert_eq!(rx2.recv().await.unwrap().resource_id, "ann1");
    }

    #[test]
    fn test_event_serializes_to_snake_case() {
        let event = DomainEvent {
            resource: ResourceKind::LearningModule,
            resource_id: "mod1".to_string(),
            action: EventAction::Created,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["resource"], "learning_module");
        assert_eq!(json["action"], "created");
    }
}
