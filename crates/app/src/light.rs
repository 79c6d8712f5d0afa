//! Light: a single fixture and the priority list of layers that may claim it.

use lightshow_domain::id::EntityId;
use lightshow_domain::power::PowerState;
use lightshow_domain::render::{self, Layer, RenderCommand};

use crate::ExhibitionKey;
use crate::exhibition::Exhibition;

/// A controllable fixture.
///
/// `power` is the manual state read once at startup. It is never updated
/// from render commands, so a fixture switched off by hand stays dark unless
/// its effective layer is allowed to interrupt.
#[derive(Debug, Clone)]
pub struct Light {
    id: EntityId,
    power: PowerState,
    interrupt: bool,
    exhibitions: Vec<ExhibitionKey>,
}

impl Light {
    #[must_use]
    pub fn new(id: EntityId, power: PowerState, interrupt: bool) -> Self {
        Self {
            id,
            power,
            interrupt,
            exhibitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Exhibitions that may claim this light, highest priority first.
    #[must_use]
    pub fn exhibitions(&self) -> &[ExhibitionKey] {
        &self.exhibitions
    }

    /// Set the priority list and compute the initial render.
    ///
    /// Repeated entries keep their first (highest priority) position.
    pub fn register_exhibitions(
        &mut self,
        ordered: impl IntoIterator<Item = ExhibitionKey>,
        layers: &[Exhibition],
    ) -> Option<RenderCommand> {
        self.exhibitions.clear();
        for key in ordered {
            if !self.exhibitions.contains(&key) {
                self.exhibitions.push(key);
            }
        }
        self.update(layers)
    }

    /// React to one of this light's exhibitions becoming active.
    #[must_use]
    pub fn activate(&self, changed: ExhibitionKey, layers: &[Exhibition]) -> Option<RenderCommand> {
        tracing::trace!(light = %self.id, ?changed, "layer activated");
        self.update(layers)
    }

    /// React to one of this light's exhibitions becoming inactive.
    ///
    /// Falls through to the next active layer beneath, if any.
    #[must_use]
    pub fn deactivate(&self, changed: ExhibitionKey, layers: &[Exhibition]) -> Option<RenderCommand> {
        tracing::trace!(light = %self.id, ?changed, "layer deactivated");
        self.update(layers)
    }

    /// First active exhibition in priority order, if any.
    #[must_use]
    pub fn effective_layer<'a>(&self, layers: &'a [Exhibition]) -> Option<&'a Exhibition> {
        self.exhibitions
            .iter()
            .filter_map(|key| layers.get(key.0))
            .find(|exhibition| exhibition.is_active())
    }

    fn update(&self, layers: &[Exhibition]) -> Option<RenderCommand> {
        let effective = self.effective_layer(layers);
        self.render(effective)
    }

    fn render(&self, effective: Option<&Exhibition>) -> Option<RenderCommand> {
        let layer = effective.map(|exhibition| Layer {
            color: exhibition.scene().color(),
            interrupt: exhibition.interrupt().unwrap_or(self.interrupt),
        });
        let command = render::decide(&self.id, self.power, layer);
        match &command {
            Some(command) => tracing::debug!(
                light = %self.id,
                layer = effective.map(|e| e.id().as_str()),
                %command,
                "light rendered"
            ),
            None => tracing::trace!(light = %self.id, power = %self.power, "light left untouched"),
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lightshow_domain::id::{ExhibitionId, SceneId};
    use lightshow_domain::render::INSTANT_TRANSITION;
    use lightshow_domain::scene::Scene;
    use tokio::sync::mpsc;

    fn layer(name: &str, color: &str, interrupt: Option<bool>, active: bool) -> Exhibition {
        let scene = Scene::builder()
            .id(SceneId::new(format!("{name}_scene")).unwrap())
            .color(color)
            .build()
            .unwrap();
        Exhibition::new(ExhibitionId::new(name).unwrap(), Arc::new(scene), interrupt, active)
    }

    fn light(power: PowerState, interrupt: bool) -> Light {
        Light::new(EntityId::new("light.hall").unwrap(), power, interrupt)
    }

    fn turn_on(color: &str) -> RenderCommand {
        RenderCommand::TurnOn {
            entity_ids: vec![EntityId::new("light.hall").unwrap()],
            color: color.to_string(),
            transition: INSTANT_TRANSITION,
        }
    }

    fn turn_off() -> RenderCommand {
        RenderCommand::TurnOff {
            entity_id: EntityId::new("light.hall").unwrap(),
        }
    }

    const HIGH: ExhibitionKey = ExhibitionKey(0);
    const LOW: ExhibitionKey = ExhibitionKey(1);

    #[test]
    fn should_select_highest_priority_active_layer() {
        let layers = vec![layer("high", "red", None, true), layer("low", "blue", None, true)];
        let mut l = light(PowerState::On, false);
        let initial = l.register_exhibitions([HIGH, LOW], &layers);
        assert_eq!(initial, Some(turn_on("red")));
        assert_eq!(l.effective_layer(&layers).unwrap().id().as_str(), "high");
    }

    #[tokio::test]
    async fn should_fall_through_to_lower_layer_when_higher_deactivates() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut layers = vec![layer("high", "red", None, false), layer("low", "blue", None, true)];
        let mut l = light(PowerState::On, false);
        l.register_exhibitions([HIGH, LOW], &layers);

        layers[0].activate(HIGH, &tx);
        assert_eq!(l.activate(HIGH, &layers), Some(turn_on("red")));

        layers[0].deactivate();
        assert_eq!(l.deactivate(HIGH, &layers), Some(turn_on("blue")));
    }

    #[test]
    fn should_turn_off_when_no_layer_active_and_powered() {
        let layers = vec![layer("high", "red", None, false)];
        let mut l = light(PowerState::On, false);
        assert_eq!(l.register_exhibitions([HIGH], &layers), Some(turn_off()));
    }

    #[test]
    fn should_respect_manual_off_without_interrupt() {
        let layers = vec![layer("high", "red", None, true)];
        let mut l = light(PowerState::Off, false);
        assert_eq!(l.register_exhibitions([HIGH], &layers), None);
    }

    #[test]
    fn should_wake_manually_off_light_when_interrupt_set() {
        let layers = vec![layer("high", "red", None, true)];
        let mut l = light(PowerState::Off, true);
        assert_eq!(l.register_exhibitions([HIGH], &layers), Some(turn_on("red")));
    }

    #[test]
    fn should_prefer_layer_interrupt_over_light_interrupt() {
        let layers = vec![
            layer("alarm", "red", Some(true), true),
            layer("quiet", "blue", Some(false), true),
        ];
        let mut wakes = light(PowerState::Off, false);
        assert_eq!(wakes.register_exhibitions([HIGH], &layers), Some(turn_on("red")));

        let mut stays_dark = light(PowerState::Off, true);
        assert_eq!(stays_dark.register_exhibitions([LOW], &layers), None);
    }

    #[test]
    fn should_keep_first_position_of_repeated_exhibition() {
        let layers = vec![layer("high", "red", None, true), layer("low", "blue", None, true)];
        let mut l = light(PowerState::On, false);
        l.register_exhibitions([LOW, HIGH, LOW], &layers);
        assert_eq!(l.exhibitions(), &[LOW, HIGH]);
        assert_eq!(l.effective_layer(&layers).unwrap().id().as_str(), "low");
    }

    #[test]
    fn should_do_nothing_when_off_and_no_layer() {
        let layers: Vec<Exhibition> = Vec::new();
        let mut l = light(PowerState::Off, true);
        assert_eq!(l.register_exhibitions(Vec::new(), &layers), None);
    }
}
