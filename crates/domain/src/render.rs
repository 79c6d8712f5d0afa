//! Render commands and the decision table that produces them.
//!
//! A light resolves its effective layer (if any) and hands the result to
//! [`decide`], which turns it into at most one command for the actuation
//! service.

use crate::id::EntityId;
use crate::power::PowerState;

/// Transition (seconds) used for every layer-driven `turn_on`.
pub const INSTANT_TRANSITION: u32 = 0;

/// A command for the external actuation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    TurnOn {
        entity_ids: Vec<EntityId>,
        color: String,
        transition: u32,
    },
    TurnOff {
        entity_id: EntityId,
    },
}

impl std::fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnOn {
                entity_ids, color, ..
            } => {
                f.write_str("turn_on(")?;
                for (idx, id) in entity_ids.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                write!(f, "; {color})")
            }
            Self::TurnOff { entity_id } => write!(f, "turn_off({entity_id})"),
        }
    }
}

/// What a light needs to know about its effective layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer<'a> {
    pub color: &'a str,
    /// Whether the layer may wake a fixture that was switched off by hand.
    pub interrupt: bool,
}

/// Decide what (if anything) to send for one light.
///
/// | power | layer | interrupt | result   |
/// |-------|-------|-----------|----------|
/// | on    | yes   | any       | turn_on  |
/// | off   | yes   | true      | turn_on  |
/// | off   | yes   | false     | nothing  |
/// | on    | no    | –         | turn_off |
/// | off   | no    | –         | nothing  |
#[must_use]
pub fn decide(entity_id: &EntityId, power: PowerState, layer: Option<Layer<'_>>) -> Option<RenderCommand> {
    match layer {
        Some(layer) if power.is_on() || layer.interrupt => Some(RenderCommand::TurnOn {
            entity_ids: vec![entity_id.clone()],
            color: layer.color.to_string(),
            transition: INSTANT_TRANSITION,
        }),
        Some(_) => None,
        None if power.is_on() => Some(RenderCommand::TurnOff {
            entity_id: entity_id.clone(),
        }),
        None => None,
    }
}

/// Merge `turn_on` commands that share color and transition.
///
/// Merged commands take the position of the first one seen; `turn_off`
/// commands are kept as they are.
#[must_use]
pub fn coalesce(commands: Vec<RenderCommand>) -> Vec<RenderCommand> {
    let mut merged: Vec<RenderCommand> = Vec::with_capacity(commands.len());
    for command in commands {
        if let RenderCommand::TurnOn {
            entity_ids,
            color,
            transition,
        } = &command
        {
            let existing = merged.iter_mut().find_map(|candidate| match candidate {
                RenderCommand::TurnOn {
                    entity_ids: ids,
                    color: c,
                    transition: t,
                } if c == color && t == transition => Some(ids),
                _ => None,
            });
            if let Some(ids) = existing {
                ids.extend(entity_ids.iter().cloned());
                continue;
            }
        }
        merged.push(command);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eid(name: &str) -> EntityId {
        EntityId::new(name).unwrap()
    }

    fn layer(interrupt: bool) -> Layer<'static> {
        Layer {
            color: "red",
            interrupt,
        }
    }

    fn turn_on(names: &[&str], color: &str) -> RenderCommand {
        RenderCommand::TurnOn {
            entity_ids: names.iter().map(|n| eid(n)).collect(),
            color: color.to_string(),
            transition: INSTANT_TRANSITION,
        }
    }

    #[test]
    fn should_turn_on_when_powered_and_layer_present() {
        let cmd = decide(&eid("light.a"), PowerState::On, Some(layer(false)));
        assert_eq!(cmd, Some(turn_on(&["light.a"], "red")));
    }

    #[test]
    fn should_turn_on_when_off_and_layer_interrupts() {
        let cmd = decide(&eid("light.a"), PowerState::Off, Some(layer(true)));
        assert_eq!(cmd, Some(turn_on(&["light.a"], "red")));
    }

    #[test]
    fn should_respect_manual_off_when_layer_does_not_interrupt() {
        assert_eq!(decide(&eid("light.a"), PowerState::Off, Some(layer(false))), None);
    }

    #[test]
    fn should_turn_off_when_powered_without_layer() {
        let cmd = decide(&eid("light.a"), PowerState::On, None);
        assert_eq!(
            cmd,
            Some(RenderCommand::TurnOff {
                entity_id: eid("light.a")
            })
        );
    }

    #[test]
    fn should_do_nothing_when_off_without_layer() {
        assert_eq!(decide(&eid("light.a"), PowerState::Off, None), None);
    }

    #[test]
    fn should_treat_unknown_power_like_off() {
        assert_eq!(decide(&eid("light.a"), PowerState::Unknown, Some(layer(false))), None);
        assert_eq!(decide(&eid("light.a"), PowerState::Unavailable, None), None);
    }

    #[test]
    fn should_merge_turn_on_with_same_color() {
        let merged = coalesce(vec![
            turn_on(&["light.a"], "red"),
            RenderCommand::TurnOff {
                entity_id: eid("light.b"),
            },
            turn_on(&["light.c"], "red"),
            turn_on(&["light.d"], "blue"),
        ]);
        assert_eq!(
            merged,
            vec![
                turn_on(&["light.a", "light.c"], "red"),
                RenderCommand::TurnOff {
                    entity_id: eid("light.b")
                },
                turn_on(&["light.d"], "blue"),
            ]
        );
    }

    #[test]
    fn should_display_commands() {
        assert_eq!(
            turn_on(&["light.a", "light.b"], "red").to_string(),
            "turn_on(light.a, light.b; red)"
        );
        assert_eq!(
            RenderCommand::TurnOff {
                entity_id: eid("light.a")
            }
            .to_string(),
            "turn_off(light.a)"
        );
    }
}
