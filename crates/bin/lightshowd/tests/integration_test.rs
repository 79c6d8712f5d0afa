//! End-to-end tests for the lightshowd stack.
//!
//! Each test parses the example setup, builds the real engine over the
//! virtual rig and drives it through the in-process event bus, exactly as
//! the daemon does. Time is paused so expirations run instantly.

use std::sync::Arc;
use std::time::Duration;

use lightshow_adapter_virtual::VirtualRig;
use lightshow_app::LightingEngine;
use lightshow_app::event_bus::InProcessEventBus;
use lightshow_app::ports::StatePublisher;
use lightshow_domain::error::LightingError;
use lightshow_domain::event::StateChanged;
use lightshow_domain::id::EntityId;
use lightshow_domain::power::PowerState;
use lightshow_domain::render::RenderCommand;
use lightshow_domain::setup::LightingSetup;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const EXAMPLE_SETUP: &str = include_str!("../lighting.example.toml");

fn eid(name: &str) -> EntityId {
    EntityId::new(name).unwrap()
}

fn turn_on(names: &[&str], color: &str) -> RenderCommand {
    RenderCommand::TurnOn {
        entity_ids: names.iter().map(|n| eid(n)).collect(),
        color: color.to_string(),
        transition: 0,
    }
}

fn setup() -> LightingSetup {
    toml::from_str(EXAMPLE_SETUP).expect("example setup should parse")
}

fn rig() -> Arc<VirtualRig> {
    Arc::new(
        VirtualRig::new()
            .with_light(eid("light.hall"), PowerState::On)
            .with_light(eid("light.porch"), PowerState::Off)
            .with_light(eid("light.living"), PowerState::On),
    )
}

struct Running {
    bus: InProcessEventBus,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Running {
    async fn start(rig: &Arc<VirtualRig>) -> Self {
        let engine = LightingEngine::build(&setup(), rig, Arc::clone(rig))
            .await
            .expect("example setup should build");
        let bus = InProcessEventBus::new(16);
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(engine.run(bus.subscribe(), async {
            let _ = stopped.await;
        }));
        Self { bus, stop, task }
    }

    async fn send(&self, entity: &str, value: &str) {
        self.bus
            .publish(StateChanged::new(eid(entity), None, value))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    async fn stop(self) {
        self.stop.send(()).unwrap();
        self.task.await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn should_render_initial_layer_on_powered_lights_only() {
    let rig = rig();
    let running = Running::start(&rig).await;

    assert_eq!(
        rig.history(),
        vec![
            turn_on(&["light.hall"], "orange"),
            turn_on(&["light.living"], "orange"),
        ]
    );
    assert_eq!(rig.fixture(&eid("light.porch")).unwrap().power, PowerState::Off);

    running.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_show_welcome_then_fall_back_after_expiration() {
    let rig = rig();
    let running = Running::start(&rig).await;

    running.send("binary_sensor.front_door", "on").await;
    assert_eq!(
        rig.fixture(&eid("light.hall")).unwrap().color.as_deref(),
        Some("white")
    );
    // porch was switched off by hand and welcome does not interrupt
    assert_eq!(rig.fixture(&eid("light.porch")).unwrap().power, PowerState::Off);

    tokio::time::sleep(Duration::from_secs(121)).await;
    assert_eq!(
        rig.fixture(&eid("light.hall")).unwrap().color.as_deref(),
        Some("orange")
    );
    assert_eq!(rig.history().len(), 4);

    running.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_batch_alarm_across_every_light_and_restore_on_disarm() {
    let rig = rig();
    let running = Running::start(&rig).await;
    let initial = rig.history().len();

    running.send("alarm_control_panel.home", "triggered").await;
    running.send("alarm_control_panel.home", "disarmed").await;

    assert_eq!(
        rig.history()[initial..],
        [
            turn_on(&["light.hall", "light.porch", "light.living"], "red"),
            turn_on(&["light.hall", "light.living"], "orange"),
        ]
    );

    running.stop().await;
}

#[tokio::test(start_paused = true)]
async fn should_ignore_events_that_match_no_trigger() {
    let rig = rig();
    let running = Running::start(&rig).await;
    let initial = rig.history();

    running.send("binary_sensor.front_door", "off").await;
    running.send("alarm_control_panel.home", "arming").await;
    running.send("sensor.unrelated", "on").await;

    assert_eq!(rig.history(), initial);
    running.stop().await;
}

#[tokio::test]
async fn should_refuse_setup_with_dangling_reference() {
    let mut setup = setup();
    setup.lights[0]
        .exhibitions
        .push("nonexistent".parse().unwrap());
    let rig = rig();

    let result = LightingEngine::build(&setup, &rig, Arc::clone(&rig)).await;

    assert!(matches!(result, Err(LightingError::NotFound(_))));
    assert!(rig.history().is_empty());
}
