//! Manual power state of a fixture, as reported by the device itself.

/// Power reading captured from the external device-state query.
///
/// Only [`On`](Self::On) counts as powered; every other reading is treated
/// like a fixture that was switched off by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
}

impl PowerState {
    /// Whether the fixture is currently powered.
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_only_report_on_for_on_state() {
        assert!(PowerState::On.is_on());
        assert!(!PowerState::Off.is_on());
        assert!(!PowerState::Unknown.is_on());
        assert!(!PowerState::Unavailable.is_on());
    }

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(PowerState::default(), PowerState::Unknown);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(PowerState::On.to_string(), "on");
        assert_eq!(PowerState::Off.to_string(), "off");
    }
}
