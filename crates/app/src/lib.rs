//! # lightshow-app
//!
//! Application layer: the layered composition engine and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Actuator`: fire-and-forget `turn_on` / `turn_off` commands
//!   - `DeviceStateSource`: manual power readings queried at startup
//!   - `StatePublisher`: feed state changes into the engine
//! - Model the runtime graph: `Exhibition`, `Light`, `Trigger`
//! - Provide the `LightingEngine` that builds the graph from a setup,
//!   dispatches state changes to triggers, and owns expiration timers
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `lightshow-domain` only (plus `tokio` for channels, tasks and
//! timers). Never imports adapter crates.

pub mod event_bus;
pub mod exhibition;
pub mod light;
pub mod lighting_engine;
pub mod ports;
pub mod trigger;

pub use lighting_engine::LightingEngine;

/// Handle to an [`Exhibition`](exhibition::Exhibition) inside the engine registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExhibitionKey(usize);

/// Handle to a [`Light`](light::Light) inside the engine registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightKey(usize);

/// Handle to a [`Trigger`](trigger::Trigger) inside the engine registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerKey(usize);
