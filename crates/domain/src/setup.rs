//! Setup records: the declarative description of scenes, exhibitions,
//! triggers, and lights loaded once at startup.
//!
//! Records only describe the graph. Resolving references between them is the
//! job of the lighting engine in the `app` crate.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LightingError, ValidationError};
use crate::id::{EntityId, ExhibitionId, SceneId, TriggerId};
use crate::scene::Scene;

/// The four ordered collections making up a lighting setup.
///
/// Order matters: it is the registration order used for trigger fan-out and
/// for nothing else. Light priorities come from [`LightRecord::exhibitions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightingSetup {
    #[serde(default)]
    pub scenes: Vec<SceneRecord>,
    #[serde(default)]
    pub exhibitions: Vec<ExhibitionRecord>,
    #[serde(default)]
    pub triggers: Vec<TriggerRecord>,
    #[serde(default)]
    pub lights: Vec<LightRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneRecord {
    pub id: SceneId,
    pub color: String,
    /// Seconds after activation at which the exhibition lapses. Fractions
    /// are allowed.
    #[serde(default)]
    pub expiration: Option<f64>,
}

impl SceneRecord {
    /// Build the immutable [`Scene`] this record describes.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::Validation`] for a blank color or an
    /// expiration that is zero, negative or not finite.
    pub fn to_scene(&self) -> Result<Scene, LightingError> {
        let mut builder = Scene::builder().id(self.id.clone()).color(&self.color);
        if let Some(secs) = self.expiration {
            let duration = Duration::try_from_secs_f64(secs)
                .map_err(|_| ValidationError::InvalidExpiration(self.id.to_string()))?;
            builder = builder.expiration(duration);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExhibitionRecord {
    pub id: ExhibitionId,
    pub scene: SceneId,
    /// Initial active flag.
    #[serde(default)]
    pub activated: bool,
    /// Overrides the interrupt flag of every light this exhibition claims.
    #[serde(default)]
    pub interrupt: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerRecord {
    pub id: TriggerId,
    /// Entity whose state changes are watched.
    pub entity_id: EntityId,
    /// New value that activates the bound exhibitions.
    pub activate: String,
    /// New value that deactivates them. Unwired when absent.
    #[serde(default)]
    pub deactivate: Option<String>,
    #[serde(default)]
    pub exhibitions: Vec<ExhibitionId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightRecord {
    pub entity_id: EntityId,
    /// Exhibitions that may claim this light, highest priority first.
    pub exhibitions: Vec<ExhibitionId>,
    #[serde(default)]
    pub interrupt: bool,
}

impl LightingSetup {
    /// Check record-local invariants. Cross references are resolved later.
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::Validation`] on duplicate identifiers within
    /// a collection, invalid scenes, or a blank trigger activation value.
    pub fn validate(&self) -> Result<(), LightingError> {
        ensure_unique("scene", self.scenes.iter().map(|s| s.id.as_str()))?;
        ensure_unique("exhibition", self.exhibitions.iter().map(|e| e.id.as_str()))?;
        ensure_unique("trigger", self.triggers.iter().map(|t| t.id.as_str()))?;
        ensure_unique("light", self.lights.iter().map(|l| l.entity_id.as_str()))?;

        for scene in &self.scenes {
            scene.to_scene()?;
        }
        for trigger in &self.triggers {
            if trigger.activate.is_empty() {
                return Err(ValidationError::EmptyActivationValue(trigger.id.to_string()).into());
            }
        }
        Ok(())
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
