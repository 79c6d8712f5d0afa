//! Lighting engine: builds the layer graph and reacts to state changes.
//!
//! The engine is the single owner of every exhibition, light and trigger.
//! Entities refer to each other through registry keys, and every mutation
//! (trigger dispatch, manual activation, expiry) runs on whichever task
//! drives the engine, so layer resolution is never re-entered concurrently.
//! The only other tasks are the expiration timers, which merely send an
//! [`Expiry`] back to the engine.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use lightshow_domain::error::{LightingError, NotFoundError};
use lightshow_domain::event::StateChanged;
use lightshow_domain::id::{EntityId, ExhibitionId, TriggerId};
use lightshow_domain::render::{RenderCommand, coalesce};
use lightshow_domain::setup::LightingSetup;

use crate::exhibition::{Exhibition, Expiry};
use crate::light::Light;
use crate::ports::actuator::{self, Actuator};
use crate::ports::DeviceStateSource;
use crate::trigger::{Trigger, TriggerAction};
use crate::{ExhibitionKey, LightKey, TriggerKey};

#[derive(Debug, Clone, Copy)]
enum Change {
    Activated,
    Deactivated,
}

/// Reactive composition engine over an [`Actuator`].
pub struct LightingEngine<A> {
    exhibitions: Vec<Exhibition>,
    lights: Vec<Light>,
    triggers: Vec<Trigger>,
    exhibition_keys: HashMap<ExhibitionId, ExhibitionKey>,
    light_keys: HashMap<EntityId, LightKey>,
    subscriptions: HashMap<EntityId, Vec<TriggerKey>>,
    actuator: A,
    expiry_tx: mpsc::UnboundedSender<Expiry>,
    expiry_rx: mpsc::UnboundedReceiver<Expiry>,
}

impl<A: Actuator> LightingEngine<A> {
    /// Build the object graph from a setup and perform the initial render.
    ///
    /// Construction is dependency ordered: scenes, exhibitions, triggers,
    /// then lights. Each light's manual power is read from `states` and the
    /// light is registered on every exhibition it lists. Initial renders are
    /// issued only once the whole graph resolved, so a broken setup never
    /// leaves fixtures half-configured.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::Validation`] for invalid records,
    /// [`LightingError::NotFound`] for unresolvable scene or exhibition
    /// references, or whatever the device-state query reports.
    #[tracing::instrument(
        skip_all,
        fields(
            scenes = setup.scenes.len(),
            exhibitions = setup.exhibitions.len(),
            triggers = setup.triggers.len(),
            lights = setup.lights.len(),
        )
    )]
    pub async fn build<S: DeviceStateSource>(
        setup: &LightingSetup,
        states: &S,
        actuator: A,
    ) -> Result<Self, LightingError> {
        setup.validate()?;

        let mut scenes = HashMap::with_capacity(setup.scenes.len());
        for record in &setup.scenes {
            scenes.insert(record.id.clone(), Arc::new(record.to_scene()?));
        }

        let mut exhibitions = Vec::with_capacity(setup.exhibitions.len());
        let mut exhibition_keys = HashMap::with_capacity(setup.exhibitions.len());
        for record in &setup.exhibitions {
            let scene = scenes.get(&record.scene).ok_or_else(|| NotFoundError {
                entity: "Scene",
                id: record.scene.to_string(),
            })?;
            exhibition_keys.insert(record.id.clone(), ExhibitionKey(exhibitions.len()));
            exhibitions.push(Exhibition::new(
                record.id.clone(),
                Arc::clone(scene),
                record.interrupt,
                record.activated,
            ));
        }

        let resolve = |id: &ExhibitionId| {
            exhibition_keys
                .get(id)
                .copied()
                .ok_or_else(|| NotFoundError {
                    entity: "Exhibition",
                    id: id.to_string(),
                })
        };

        let mut triggers = Vec::with_capacity(setup.triggers.len());
        let mut subscriptions: HashMap<EntityId, Vec<TriggerKey>> = HashMap::new();
        for record in &setup.triggers {
            let mut trigger = Trigger::new(
                record.id.clone(),
                record.entity_id.clone(),
                record.activate.clone(),
                record.deactivate.clone(),
            );
            for id in &record.exhibitions {
                trigger.register_exhibition(resolve(id)?);
            }
            subscriptions
                .entry(record.entity_id.clone())
                .or_default()
                .push(TriggerKey(triggers.len()));
            triggers.push(trigger);
        }

        let mut lights = Vec::with_capacity(setup.lights.len());
        let mut light_keys = HashMap::with_capacity(setup.lights.len());
        let mut priorities = Vec::with_capacity(setup.lights.len());
        for record in &setup.lights {
            let power = states.power_state(&record.entity_id).await?;
            let key = LightKey(lights.len());
            let mut ordered = Vec::with_capacity(record.exhibitions.len());
            for id in &record.exhibitions {
                let exhibition = resolve(id)?;
                exhibitions[exhibition.0].register_light(key);
                ordered.push(exhibition);
            }
            tracing::debug!(light = %record.entity_id, %power, "light registered");
            light_keys.insert(record.entity_id.clone(), key);
            lights.push(Light::new(record.entity_id.clone(), power, record.interrupt));
            priorities.push((key, ordered));
        }

        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let mut engine = Self {
            exhibitions,
            lights,
            triggers,
            exhibition_keys,
            light_keys,
            subscriptions,
            actuator,
            expiry_tx,
            expiry_rx,
        };

        for (key, ordered) in priorities {
            let initial = engine.lights[key.0].register_exhibitions(ordered, &engine.exhibitions);
            if let Some(command) = initial {
                engine.dispatch(command).await;
            }
        }

        tracing::info!("lighting engine ready");
        Ok(engine)
    }

    /// Activate an exhibition by id, re-rendering every light it may claim.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::NotFound`] for an unknown id.
    pub async fn activate_exhibition(&mut self, id: &ExhibitionId) -> Result<(), LightingError> {
        let key = self.exhibition_key(id)?;
        self.activate(key).await;
        Ok(())
    }

    /// Deactivate an exhibition by id, cancelling its pending expiry.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::NotFound`] for an unknown id.
    pub async fn deactivate_exhibition(&mut self, id: &ExhibitionId) -> Result<(), LightingError> {
        let key = self.exhibition_key(id)?;
        self.deactivate(key).await;
        Ok(())
    }

    /// Dispatch a state change to the triggers watching its entity.
    ///
    /// Returns the ids of the triggers that fired, in registration order.
    #[tracing::instrument(skip_all, fields(entity = %event.entity_id, value = %event.new_value))]
    pub async fn handle_state_change(&mut self, event: &StateChanged) -> Vec<TriggerId> {
        let Some(subscribed) = self.subscriptions.get(&event.entity_id).cloned() else {
            return Vec::new();
        };

        let mut fired = Vec::new();
        for key in subscribed {
            let trigger = &self.triggers[key.0];
            let Some(action) = trigger.evaluate(event) else {
                tracing::trace!(trigger = %trigger.id(), "state change ignored");
                continue;
            };
            tracing::info!(trigger = %trigger.id(), ?action, "trigger fired");
            fired.push(trigger.id().clone());

            let targets = trigger.exhibitions().to_vec();
            for exhibition in targets {
                match action {
                    TriggerAction::Activate => self.activate(exhibition).await,
                    TriggerAction::Deactivate => self.deactivate(exhibition).await,
                }
            }
        }
        fired
    }

    /// Wait for the next expiration timer to fire.
    pub async fn next_expiry(&mut self) -> Option<Expiry> {
        self.expiry_rx.recv().await
    }

    /// Apply an expiry, deactivating its exhibition unless it is stale.
    ///
    /// Returns whether the exhibition was deactivated.
    pub async fn handle_expiry(&mut self, expiry: Expiry) -> bool {
        let Some(exhibition) = self.exhibitions.get(expiry.exhibition.0) else {
            return false;
        };
        if !exhibition.is_current(&expiry) {
            tracing::debug!(exhibition = %exhibition.id(), "stale expiry dropped");
            return false;
        }
        tracing::info!(exhibition = %exhibition.id(), "exhibition expired");
        self.deactivate(expiry.exhibition).await;
        true
    }

    /// Drive the engine until `shutdown` resolves or the event bus closes.
    pub async fn run(
        mut self,
        mut events: broadcast::Receiver<StateChanged>,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("lighting engine shutting down");
                    break;
                }
                Some(expiry) = self.expiry_rx.recv() => {
                    self.handle_expiry(expiry).await;
                }
                received = events.recv() => match received {
                    Ok(event) => {
                        self.handle_state_change(&event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "lighting engine lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("event bus closed, lighting engine stopping");
                        break;
                    }
                },
            }
        }
    }

    /// Whether the exhibition is active, `None` for an unknown id.
    #[must_use]
    pub fn is_active(&self, id: &ExhibitionId) -> Option<bool> {
        self.exhibition(id).map(Exhibition::is_active)
    }

    #[must_use]
    pub fn exhibition(&self, id: &ExhibitionId) -> Option<&Exhibition> {
        self.exhibition_keys
            .get(id)
            .and_then(|key| self.exhibitions.get(key.0))
    }

    #[must_use]
    pub fn light(&self, id: &EntityId) -> Option<&Light> {
        self.light_keys.get(id).and_then(|key| self.lights.get(key.0))
    }

    /// The exhibition currently governing `light`, if any.
    #[must_use]
    pub fn effective_layer(&self, light: &EntityId) -> Option<&ExhibitionId> {
        self.light(light)?
            .effective_layer(&self.exhibitions)
            .map(Exhibition::id)
    }

    #[must_use]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    fn exhibition_key(&self, id: &ExhibitionId) -> Result<ExhibitionKey, LightingError> {
        self.exhibition_keys.get(id).copied().ok_or_else(|| {
            NotFoundError {
                entity: "Exhibition",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn activate(&mut self, key: ExhibitionKey) {
        self.exhibitions[key.0].activate(key, &self.expiry_tx);
        self.render_lights(key, Change::Activated).await;
    }

    async fn deactivate(&mut self, key: ExhibitionKey) {
        self.exhibitions[key.0].deactivate();
        self.render_lights(key, Change::Deactivated).await;
    }

    /// Re-resolve every light of `changed` and send the resulting commands,
    /// merging `turn_on`s that share a color.
    async fn render_lights(&self, changed: ExhibitionKey, change: Change) {
        let commands: Vec<RenderCommand> = self.exhibitions[changed.0]
            .lights()
            .iter()
            .filter_map(|key| self.lights.get(key.0))
            .filter_map(|light| match change {
                Change::Activated => light.activate(changed, &self.exhibitions),
                Change::Deactivated => light.deactivate(changed, &self.exhibitions),
            })
            .collect();

        for command in coalesce(commands) {
            self.dispatch(command).await;
        }
    }

    async fn dispatch(&self, command: RenderCommand) {
        let summary = command.to_string();
        if let Err(err) = actuator::dispatch(&self.actuator, command).await {
            tracing::warn!(error = %err, command = %summary, "render command failed");
        }
    }
}
