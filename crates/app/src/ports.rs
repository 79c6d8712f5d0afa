//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the lighting engine and the outside
//! world. They are defined here (in `app`) so that both the engine and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod actuator;
pub mod device_state;
pub mod event_bus;

pub use actuator::Actuator;
pub use device_state::DeviceStateSource;
pub use event_bus::StatePublisher;
