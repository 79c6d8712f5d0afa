//! Line-oriented state-change input.
//!
//! Each line reads `<entity_id> <new_value>`. Blank lines and lines starting
//! with `#` are skipped. The previous value seen for an entity becomes the
//! event's `old_value`.

use std::collections::HashMap;

use lightshow_domain::event::StateChanged;
use lightshow_domain::id::EntityId;

/// Why a line could not be turned into a state change.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("expected `<entity_id> <value>`, got {0:?}")]
    Malformed(String),
    #[error("invalid entity id")]
    EntityId,
}

/// Remembers the last value per entity so events carry their old value.
#[derive(Debug, Default)]
pub struct StateReader {
    last: HashMap<EntityId, String>,
}

impl StateReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one input line. `Ok(None)` means the line carried nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the line is not `<entity_id> <value>`.
    pub fn read_line(&mut self, line: &str) -> Result<Option<StateChanged>, InputError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let Some((entity, value)) = line.split_once(char::is_whitespace) else {
            return Err(InputError::Malformed(line.to_string()));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(InputError::Malformed(line.to_string()));
        }
        let entity_id = EntityId::new(entity).map_err(|_| InputError::EntityId)?;

        let old_value = self.last.insert(entity_id.clone(), value.to_string());
        Ok(Some(StateChanged::new(entity_id, old_value, value)))
    }
}
