//! Trigger: binds one watched entity to a set of exhibitions.

use lightshow_domain::event::StateChanged;
use lightshow_domain::id::{EntityId, TriggerId};

use crate::ExhibitionKey;

/// What a matching state change asks the bound exhibitions to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    Activate,
    Deactivate,
}

/// A state-change rule.
///
/// Triggers are stateless: they only tell the engine which exhibitions to
/// flip, in registration order.
#[derive(Debug, Clone)]
pub struct Trigger {
    id: TriggerId,
    entity_id: EntityId,
    activate_value: String,
    deactivate_value: Option<String>,
    exhibitions: Vec<ExhibitionKey>,
}

impl Trigger {
    /// Create a trigger watching `entity_id`.
    ///
    /// With `deactivate_value` left `None` no event ever deactivates the
    /// bound exhibitions.
    #[must_use]
    pub fn new(
        id: TriggerId,
        entity_id: EntityId,
        activate_value: impl Into<String>,
        deactivate_value: Option<String>,
    ) -> Self {
        Self {
            id,
            entity_id,
            activate_value: activate_value.into(),
            deactivate_value,
            exhibitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TriggerId {
        &self.id
    }

    #[must_use]
    pub fn exhibitions(&self) -> &[ExhibitionKey] {
        &self.exhibitions
    }

    pub fn register_exhibition(&mut self, exhibition: ExhibitionKey) {
        self.exhibitions.push(exhibition);
    }

    /// Map a state change to the action it requests, if any.
    ///
    /// Only main-state changes of the watched entity are considered.
    /// Values matching neither the activation nor the (optional)
    /// deactivation value are ignored.
    #[must_use]
    pub fn evaluate(&self, event: &StateChanged) -> Option<TriggerAction> {
        if event.entity_id != self.entity_id || event.attribute.is_some() {
            return None;
        }
        if event.new_value == self.activate_value {
            return Some(TriggerAction::Activate);
        }
        if self.deactivate_value.as_deref() == Some(event.new_value.as_str()) {
            return Some(TriggerAction::Deactivate);
        }
        None
    }
}
