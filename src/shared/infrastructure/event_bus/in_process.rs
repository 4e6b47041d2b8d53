// In-process implementation of the ChangeNotifier port.
//
// Purpose
// - Fan events out to subscribers within the same process, in subscription order.
//
// Responsibilities
// - Await each handler in turn so a publisher observes the projection catching up.
// - Log handler failures instead of surfacing them to the publisher.

use crate::shared::infrastructure::event_bus::{ChangeHandler, ChangeNotifier, Topic};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InProcessEventBus<Event>
where
    Event: Send + Sync + 'static,
{
    handlers: RwLock<Vec<Arc<dyn ChangeHandler<Event>>>>,
}

impl<Event> Default for InProcessEventBus<Event>
where
    Event: Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<Event> InProcessEventBus<Event>
where
    Event: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscriber_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

#[async_trait::async_trait]
impl<Event> ChangeNotifier<Event> for InProcessEventBus<Event>
where
    Event: Topic + Send + Sync + 'static,
{
    async fn publish(&self, event: Event) {
        // Snapshot so no lock is held while handlers do their own I/O.
        let handlers = self.handlers.read().await.clone();
        for handler in handlers {
            if let Err(err) = handler.handle(&event).await {
                tracing::warn!(
                    handler = handler.name(),
                    topic = event.topic(),
                    error = %err,
                    "change handler failed"
                );
            }
        }
    }

    async fn subscribe(&self, handler: Arc<dyn ChangeHandler<Event>>) {
        tracing::debug!(handler = handler.name(), "subscribing change handler");
        self.handlers.write().await.push(handler);
    }
}
