//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use lightshow_domain::error::LightingError;
use lightshow_domain::event::StateChanged;

use crate::ports::StatePublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<StateChanged>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to state changes on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.sender.subscribe()
    }
}

impl StatePublisher for InProcessEventBus {
    fn publish(&self, event: StateChanged) -> impl Future<Output = Result<(), LightingError>> + Send {
        // send only fails when nobody listens, which is fine.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}
