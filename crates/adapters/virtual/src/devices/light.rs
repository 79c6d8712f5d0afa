//! Virtual light: a fixture that remembers its power and color.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lightshow_domain::power::PowerState;

/// Observable state of a simulated fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureState {
    pub power: PowerState,
    pub color: Option<String>,
    pub transition: u32,
}

/// A simulated light that can be turned on and off.
#[derive(Debug)]
pub struct VirtualLight {
    state: Mutex<FixtureState>,
}

impl VirtualLight {
    #[must_use]
    pub fn new(power: PowerState) -> Self {
        Self {
            state: Mutex::new(FixtureState {
                power,
                color: None,
                transition: 0,
            }),
        }
    }

    /// Snapshot of the fixture's current state.
    #[must_use]
    pub fn state(&self) -> FixtureState {
        self.lock_state().clone()
    }

    pub fn turn_on(&self, color: &str, transition: u32) {
        let mut state = self.lock_state();
        state.power = PowerState::On;
        state.color = Some(color.to_string());
        state.transition = transition;
    }

    pub fn turn_off(&self) {
        self.lock_state().power = PowerState::Off;
    }

    /// Simulate someone flipping the wall switch.
    pub fn set_power(&self, power: PowerState) {
        self.lock_state().power = power;
    }

    fn lock_state(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
