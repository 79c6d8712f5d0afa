//! Exhibition: a named, toggleable layer binding one scene to a set of lights.
//!
//! An exhibition only tracks its own state: the active flag, the lights it
//! may claim, and the pending expiration timer. Re-rendering the lights is
//! done by the engine, which owns both sides of the graph.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use lightshow_domain::id::ExhibitionId;
use lightshow_domain::scene::Scene;

use crate::{ExhibitionKey, LightKey};

/// Message sent by an expiration timer once its scene's duration elapsed.
///
/// Carries the activation generation it was armed for, so an expiry that
/// raced a re-activation or an explicit deactivation is recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub(crate) exhibition: ExhibitionKey,
    pub(crate) generation: u64,
}

/// A lighting layer.
#[derive(Debug)]
pub struct Exhibition {
    id: ExhibitionId,
    scene: Arc<Scene>,
    interrupt: Option<bool>,
    lights: Vec<LightKey>,
    active: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Exhibition {
    /// Create an exhibition in its initial state.
    ///
    /// `activated` only sets the flag; no expiration timer is armed for an
    /// exhibition that starts out active.
    #[must_use]
    pub fn new(id: ExhibitionId, scene: Arc<Scene>, interrupt: Option<bool>, activated: bool) -> Self {
        Self {
            id,
            scene,
            interrupt,
            lights: Vec::new(),
            active: activated,
            generation: 0,
            timer: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ExhibitionId {
        &self.id
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Per-layer override of the lights' interrupt flag.
    #[must_use]
    pub fn interrupt(&self) -> Option<bool> {
        self.interrupt
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lights that list this exhibition, in registration order.
    #[must_use]
    pub fn lights(&self) -> &[LightKey] {
        &self.lights
    }

    /// Whether an expiration timer is currently pending.
    #[must_use]
    pub fn has_pending_expiry(&self) -> bool {
        self.timer.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Register a light this exhibition may claim.
    ///
    /// Registering the same light twice is a no-op. Returns whether the light
    /// was newly added.
    pub fn register_light(&mut self, light: LightKey) -> bool {
        if self.lights.contains(&light) {
            return false;
        }
        self.lights.push(light);
        true
    }

    /// Mark the exhibition active and (re)arm its expiration timer.
    ///
    /// Any timer left over from a previous activation is cancelled first, so
    /// at most one expiry is ever pending. The timer runs on its own task and
    /// reports back through `expiries`.
    pub fn activate(&mut self, key: ExhibitionKey, expiries: &mpsc::UnboundedSender<Expiry>) {
        self.cancel_timer();
        self.generation += 1;
        self.active = true;
        tracing::info!(exhibition = %self.id, scene = %self.scene.id(), "exhibition activated");

        if let Some(duration) = self.scene.expiration() {
            self.arm_timer(key, duration, expiries.clone());
        }
    }

    /// Mark the exhibition inactive and cancel any pending expiry.
    pub fn deactivate(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.active = false;
        tracing::info!(exhibition = %self.id, "exhibition deactivated");
    }

    /// Whether `expiry` belongs to the current activation.
    #[must_use]
    pub fn is_current(&self, expiry: &Expiry) -> bool {
        self.active && expiry.generation == self.generation
    }

    fn arm_timer(
        &mut self,
        key: ExhibitionKey,
        duration: Duration,
        expiries: mpsc::UnboundedSender<Expiry>,
    ) {
        let expiry = Expiry {
            exhibition: key,
            generation: self.generation,
        };
        tracing::debug!(
            exhibition = %self.id,
            expires_in_secs = duration.as_secs_f64(),
            "expiration timer armed"
        );
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // the engine is gone when the receiver is closed
            let _ = expiries.send(expiry);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            if !handle.is_finished() {
                tracing::debug!(exhibition = %self.id, "expiration timer cancelled");
            }
            handle.abort();
        }
    }
}

impl Drop for Exhibition {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}
