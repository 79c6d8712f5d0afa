//! # lightshowd: lighting daemon
//!
//! Composition root that wires the lighting engine to its adapters.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise `tracing` with the configured filter
//! - Load the lighting setup and build the virtual rig from its lights
//! - Build the `LightingEngine` (fatal on any setup error)
//! - Run the engine on its own task, fed by the in-process event bus
//! - Read `<entity_id> <value>` lines from stdin and publish them as state changes
//! - Handle graceful shutdown (Ctrl-C or end of input)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod input;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lightshow_adapter_virtual::VirtualRig;
use lightshow_app::LightingEngine;
use lightshow_app::event_bus::InProcessEventBus;
use lightshow_app::ports::StatePublisher;
use lightshow_domain::power::PowerState;

use config::Config;
use input::StateReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let setup = config.load_setup()?;
    tracing::info!(path = %config.lighting.setup_path.display(), "lighting setup loaded");

    // Virtual fixtures start powered so the initial render is visible.
    let rig = Arc::new(setup.lights.iter().fold(VirtualRig::new(), |rig, light| {
        rig.with_light(light.entity_id.clone(), PowerState::On)
    }));

    let engine = LightingEngine::build(&setup, &rig, Arc::clone(&rig)).await?;

    let bus = InProcessEventBus::new(config.events.capacity);
    let engine_task = tokio::spawn(engine.run(bus.subscribe(), std::future::pending()));

    let mut reader = StateReader::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) => match reader.read_line(&line) {
                    Ok(Some(event)) => bus.publish(event).await?,
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "ignoring input line"),
                },
                None => {
                    tracing::info!("end of input");
                    break;
                }
            },
        }
    }

    // Dropping the only sender closes the bus, which stops the engine.
    drop(bus);
    engine_task.await?;

    for command in rig.history() {
        tracing::debug!(%command, "rendered");
    }
    Ok(())
}
