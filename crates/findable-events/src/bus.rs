//! A small broadcast bus for run-lifecycle events. Every subscriber gets
//! every event; a lagging subscriber drops the oldest buffered events
//! rather than blocking the publisher (`tokio::sync::broadcast` semantics).

use chrono::{DateTime, Utc};
use findable_types::run::RunPhase;
use tokio::sync::broadcast;

/// A lifecycle event for one run, published as its pipeline progresses.
#[derive(Debug, Clone)]
pub enum RunEvent {
    PhaseStarted {
        run_id: String,
        phase: RunPhase,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        run_id: String,
        phase: RunPhase,
        at: DateTime<Utc>,
    },
    RunCompleted {
        run_id: String,
        partial: bool,
        at: DateTime<Utc>,
    },
    RunFailed {
        run_id: String,
        message: String,
        at: DateTime<Utc>,
    },
}

impl RunEvent {
    pub fn run_id(&self) -> &str {
        match self {
            RunEvent::PhaseStarted { run_id, .. }
            | RunEvent::PhaseCompleted { run_id, .. }
            | RunEvent::RunCompleted { run_id, .. }
            | RunEvent::RunFailed { run_id, .. } => run_id,
        }
    }
}

/// Thread-safe, multi-subscriber event bus. Cloning it is cheap — every
/// clone shares the same broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RunEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers it reached; a
    /// bus with no subscribers yet is not an error.
    pub fn publish(&self, event: RunEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(RunEvent::PhaseStarted {
            run_id: "run-1".to_string(),
            phase: RunPhase::Crawl,
            at: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.run_id(), "run-1");
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(RunEvent::RunFailed {
            run_id: "run-2".to_string(),
            message: "boom".to_string(),
            at: Utc::now(),
        }), 0);
    }
}
