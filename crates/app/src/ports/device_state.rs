//! Device-state port: manual power readings of fixtures.

use std::future::Future;
use std::sync::Arc;

use lightshow_domain::error::LightingError;
use lightshow_domain::id::EntityId;
use lightshow_domain::power::PowerState;

/// Answers "is this light on right now?".
///
/// Only queried while the engine is being built; later changes to the
/// fixture's physical state are not tracked. Adapters report a failed
/// query as [`LightingError::DeviceState`].
pub trait DeviceStateSource {
    fn power_state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<PowerState, LightingError>> + Send;
}

impl<T: DeviceStateSource + Send + Sync> DeviceStateSource for Arc<T> {
    fn power_state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<PowerState, LightingError>> + Send {
        (**self).power_state(entity_id)
    }
}
