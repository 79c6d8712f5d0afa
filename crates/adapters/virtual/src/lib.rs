//! # lightshow-adapter-virtual
//!
//! Virtual rig that stands in for the external light-control service and
//! the device-state store.
//!
//! Every fixture is a [`VirtualLight`] keyed by its entity id. The rig
//! implements both [`Actuator`] and [`DeviceStateSource`], applies each
//! command to its fixtures and keeps a log of everything it received.
//!
//! ## Dependency rule
//!
//! Depends on `lightshow-app` (port traits) and `lightshow-domain` only.

mod devices;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use lightshow_app::ports::{Actuator, DeviceStateSource};
use lightshow_domain::error::{LightingError, NotFoundError};
use lightshow_domain::id::EntityId;
use lightshow_domain::power::PowerState;
use lightshow_domain::render::RenderCommand;

pub use devices::{FixtureState, VirtualLight};

/// A set of simulated fixtures plus the command log.
#[derive(Debug, Default)]
pub struct VirtualRig {
    lights: HashMap<EntityId, VirtualLight>,
    log: Mutex<Vec<RenderCommand>>,
}

impl VirtualRig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixture with its initial manual power. Re-adding an entity
    /// replaces the previous fixture.
    #[must_use]
    pub fn with_light(mut self, entity_id: EntityId, power: PowerState) -> Self {
        self.lights.insert(entity_id, VirtualLight::new(power));
        self
    }

    /// Current state of a fixture.
    #[must_use]
    pub fn fixture(&self, entity_id: &EntityId) -> Option<FixtureState> {
        self.lights.get(entity_id).map(VirtualLight::state)
    }

    /// Flip a fixture's power by hand, as a person at the wall switch would.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::NotFound`] for an unknown entity.
    pub fn set_manual_power(&self, entity_id: &EntityId, power: PowerState) -> Result<(), LightingError> {
        self.light(entity_id)?.set_power(power);
        Ok(())
    }

    /// Every command received so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<RenderCommand> {
        self.log
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |g| g.clone())
    }

    fn record(&self, command: RenderCommand) {
        tracing::debug!(%command, "virtual rig received command");
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    fn light(&self, entity_id: &EntityId) -> Result<&VirtualLight, LightingError> {
        self.lights.get(entity_id).ok_or_else(|| {
            NotFoundError {
                entity: "Light",
                id: entity_id.to_string(),
            }
            .into()
        })
    }

    fn apply_turn_on(
        &self,
        entity_ids: Vec<EntityId>,
        color: String,
        transition: u32,
    ) -> Result<(), LightingError> {
        let targets = entity_ids
            .iter()
            .map(|id| self.light(id))
            .collect::<Result<Vec<_>, _>>()?;
        for light in targets {
            light.turn_on(&color, transition);
        }
        self.record(RenderCommand::TurnOn {
            entity_ids,
            color,
            transition,
        });
        Ok(())
    }

    fn apply_turn_off(&self, entity_id: EntityId) -> Result<(), LightingError> {
        self.light(&entity_id)?.turn_off();
        self.record(RenderCommand::TurnOff { entity_id });
        Ok(())
    }
}

impl Actuator for VirtualRig {
    fn turn_on(
        &self,
        entity_ids: Vec<EntityId>,
        color: String,
        transition: u32,
    ) -> impl Future<Output = Result<(), LightingError>> + Send {
        let result = self.apply_turn_on(entity_ids, color, transition);
        async { result }
    }

    fn turn_off(
        &self,
        entity_id: EntityId,
    ) -> impl Future<Output = Result<(), LightingError>> + Send {
        let result = self.apply_turn_off(entity_id);
        async { result }
    }
}

impl DeviceStateSource for VirtualRig {
    fn power_state(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<PowerState, LightingError>> + Send {
        let result = self.light(entity_id).map(|light| light.state().power);
        async { result }
    }
}
