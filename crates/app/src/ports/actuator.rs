//! Actuator port: the external light-control service.

use std::future::Future;
use std::sync::Arc;

use lightshow_domain::error::LightingError;
use lightshow_domain::id::EntityId;
use lightshow_domain::render::RenderCommand;

/// Sends render commands to physical (or virtual) fixtures.
///
/// Calls are fire-and-forget from the engine's point of view: a returned
/// error is logged, never retried.
pub trait Actuator {
    /// Switch the given lights on with a color and transition (seconds).
    fn turn_on(
        &self,
        entity_ids: Vec<EntityId>,
        color: String,
        transition: u32,
    ) -> impl Future<Output = Result<(), LightingError>> + Send;

    /// Switch a single light off.
    fn turn_off(&self, entity_id: EntityId)
    -> impl Future<Output = Result<(), LightingError>> + Send;
}

impl<T: Actuator + Send + Sync> Actuator for Arc<T> {
    fn turn_on(
        &self,
        entity_ids: Vec<EntityId>,
        color: String,
        transition: u32,
    ) -> impl Future<Output = Result<(), LightingError>> + Send {
        (**self).turn_on(entity_ids, color, transition)
    }

    fn turn_off(
        &self,
        entity_id: EntityId,
    ) -> impl Future<Output = Result<(), LightingError>> + Send {
        (**self).turn_off(entity_id)
    }
}

/// Route a [`RenderCommand`] to the matching actuator call.
///
/// # Errors
///
/// Propagates whatever the actuator reports.
pub async fn dispatch<A: Actuator>(actuator: &A, command: RenderCommand) -> Result<(), LightingError> {
    match command {
        RenderCommand::TurnOn {
            entity_ids,
            color,
            transition,
        } => actuator.turn_on(entity_ids, color, transition).await,
        RenderCommand::TurnOff { entity_id } => actuator.turn_off(entity_id).await,
    }
}
