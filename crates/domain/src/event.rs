//! Event: a state change reported by the external event source.

use crate::id::EntityId;

/// A single state transition of an external entity.
///
/// Mirrors the callback arguments of the host event source:
/// `(entity, attribute, old_value, new_value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChanged {
    pub entity_id: EntityId,
    /// Attribute that changed, `None` for the main state.
    pub attribute: Option<String>,
    pub old_value: Option<String>,
    pub new_value: String,
}

impl StateChanged {
    /// Build a main-state change.
    #[must_use]
    pub fn new(entity_id: EntityId, old_value: Option<String>, new_value: impl Into<String>) -> Self {
        Self {
            entity_id,
            attribute: None,
            old_value,
            new_value: new_value.into(),
        }
    }

    /// Attach the attribute name this change concerns.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_main_state_change() {
        let eid = EntityId::new("binary_sensor.door").unwrap();
        let event = StateChanged::new(eid.clone(), Some("off".to_string()), "on");
        assert_eq!(event.entity_id, eid);
        assert!(event.attribute.is_none());
        assert_eq!(event.old_value.as_deref(), Some("off"));
        assert_eq!(event.new_value, "on");
    }

    #[test]
    fn should_attach_attribute() {
        let eid = EntityId::new("sensor.lux").unwrap();
        let event = StateChanged::new(eid, None, "12").with_attribute("illuminance");
        assert_eq!(event.attribute.as_deref(), Some("illuminance"));
    }
}
