//! Event bus port: publish state changes to the engine.

use std::future::Future;

use lightshow_domain::error::LightingError;
use lightshow_domain::event::StateChanged;

/// Publishes external state changes to interested subscribers.
pub trait StatePublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: StateChanged)
    -> impl Future<Output = Result<(), LightingError>> + Send;
}

impl<T: StatePublisher + Send + Sync> StatePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: StateChanged,
    ) -> impl Future<Output = Result<(), LightingError>> + Send {
        (**self).publish(event)
    }
}
