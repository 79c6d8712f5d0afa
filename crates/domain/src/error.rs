//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`LightingError`] via `#[from]`. No `String` variants.

/// Top-level error for the lighting system.
#[derive(Debug, thiserror::Error)]
pub enum LightingError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("reference not found")]
    NotFound(#[from] NotFoundError),

    /// Failure reported by the actuation service.
    #[error("actuation error")]
    Actuation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Failure reported by the device-state query.
    #[error("device state query failed")]
    DeviceState(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations detected while building the object graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("scene {0} has an empty color")]
    EmptyColor(String),

    #[error("scene {0} has a zero expiration")]
    ZeroExpiration(String),

    #[error("scene {0} has a negative or non-finite expiration")]
    InvalidExpiration(String),

    #[error("duplicate {kind} identifier {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("trigger {0} has an empty activation value")]
    EmptyActivationValue(String),
}

/// A configuration record references something that was never declared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
