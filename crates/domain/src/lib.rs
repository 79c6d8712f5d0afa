//! # lightshow-domain
//!
//! Pure domain model for the lightshow layered lighting system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define **Scenes** (immutable color presets with optional expiry)
//! - Define **power readings** of fixtures and **state-change events**
//! - Define **render commands** and the decision table that produces them
//! - Define the **setup records** the object graph is built from
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod event;
pub mod power;
pub mod render;
pub mod scene;
pub mod setup;
