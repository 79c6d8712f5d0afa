//! Scene: an immutable named color preset with an optional expiry.
//!
//! Scenes carry no behaviour. Exhibitions bind a scene to a set of lights and
//! use [`Scene::expiration`] to decide whether an activation should lapse on
//! its own.

use std::time::Duration;

use crate::error::{LightingError, ValidationError};
use crate::id::SceneId;

/// A color preset shared by any number of exhibitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    id: SceneId,
    color: String,
    expiration: Option<Duration>,
}

impl Scene {
    /// Create a builder for constructing a [`Scene`].
    #[must_use]
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> &SceneId {
        &self.id
    }

    /// Color name passed verbatim to the actuation service.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// How long an activation of this scene lasts before it lapses.
    #[must_use]
    pub fn expiration(&self) -> Option<Duration> {
        self.expiration
    }
}

/// Step-by-step builder for [`Scene`].
#[derive(Debug, Default)]
pub struct SceneBuilder {
    id: Option<SceneId>,
    color: Option<String>,
    expiration: Option<Duration>,
}

impl SceneBuilder {
    #[must_use]
    pub fn id(mut self, id: SceneId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Consume the builder, validate, and return a [`Scene`].
    ///
    /// # Errors
    ///
    /// Returns [`LightingError::Validation`] when:
    /// - no id was given ([`ValidationError::EmptyId`])
    /// - the color is missing or blank ([`ValidationError::EmptyColor`])
    /// - the expiration is zero ([`ValidationError::ZeroExpiration`])
    pub fn build(self) -> Result<Scene, LightingError> {
        let id = self.id.ok_or(ValidationError::EmptyId)?;
        let color = self.color.unwrap_or_default();
        if color.trim().is_empty() {
            return Err(ValidationError::EmptyColor(id.to_string()).into());
        }
        if self.expiration.is_some_and(|d| d.is_zero()) {
            return Err(ValidationError::ZeroExpiration(id.to_string()).into());
        }
        Ok(Scene {
            id,
            color,
            expiration: self.expiration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_id(name: &str) -> SceneId {
        SceneId::new(name).unwrap()
    }

    #[test]
    fn should_build_scene_without_expiration() {
        let scene = Scene::builder()
            .id(scene_id("evening"))
            .color("orange")
            .build()
            .unwrap();
        assert_eq!(scene.id().as_str(), "evening");
        assert_eq!(scene.color(), "orange");
        assert!(scene.expiration().is_none());
    }

    #[test]
    fn should_keep_expiration_when_given() {
        let scene = Scene::builder()
            .id(scene_id("doorbell"))
            .color("blue")
            .expiration(Duration::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(scene.expiration(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn should_return_validation_error_when_id_missing() {
        let result = Scene::builder().color("red").build();
        assert!(matches!(
            result,
            Err(LightingError::Validation(ValidationError::EmptyId))
        ));
    }

    #[test]
    fn should_return_validation_error_when_color_missing() {
        let result = Scene::builder().id(scene_id("blank")).build();
        assert!(matches!(
            result,
            Err(LightingError::Validation(ValidationError::EmptyColor(id))) if id == "blank"
        ));
    }

    #[test]
    fn should_reject_zero_expiration() {
        let result = Scene::builder()
            .id(scene_id("flash"))
            .color("white")
            .expiration(Duration::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(LightingError::Validation(ValidationError::ZeroExpiration(_)))
        ));
    }
}
