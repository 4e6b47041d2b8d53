// Change notification port.
//
// Purpose
// - Decouple writers from the read models that follow them.
//
// Responsibilities
// - `publish` hands an event to every subscribed handler.
// - `subscribe` registers a handler for all subsequent events.
//
// Boundaries
// - Delivery guarantees belong to the implementation. The in-process bus is
//   synchronous and not durable; a broker-backed bus can replace it without
//   touching publishers or handlers.

pub mod in_process;

use async_trait::async_trait;
use std::sync::Arc;

/// Implemented by anything that names the topic an event is published under.
pub trait Topic {
    fn topic(&self) -> &'static str;
}

#[async_trait]
pub trait ChangeHandler<Event>: Send + Sync
where
    Event: Send + Sync + 'static,
{
    fn name(&self) -> &str;
    async fn handle(&self, event: &Event) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ChangeNotifier<Event>: Send + Sync
where
    Event: Send + Sync + 'static,
{
    async fn publish(&self, event: Event);
    async fn subscribe(&self, handler: Arc<dyn ChangeHandler<Event>>);
}
