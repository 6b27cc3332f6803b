//! `pointer-sim`: runs the pointer choreographer against headless collaborators.
//!
//! ```text
//! pointer-sim <config.toml> [scenario.toml]
//! ```
//!
//! ```text
//! main()
//!  └─ load_config()            -- displays, topology, devices, flags
//!  └─ PointerChoreographer::new()
//!       ├─ HeadlessPolicy        (records controllers and callbacks)
//!       ├─ StaticWindowInfosFeed (window updates from the scenario)
//!       └─ RecordingInputListener
//!  └─ replay scenario steps, then print the dump
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pointer_choreographer::application::PointerChoreographer;
use pointer_choreographer::infrastructure::headless::{
    HeadlessPolicy, RecordingInputListener, StaticWindowInfosFeed,
};
use pointer_choreographer::infrastructure::storage::config::{load_config, SimulatorConfig};
use pointer_choreographer::infrastructure::storage::scenario::{load_scenario, run_step};
use pointer_core::input::notify::InputDevicesChangedArgs;

const USAGE: &str = "usage: pointer-sim <config.toml> [scenario.toml]";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1);
    let config_path = PathBuf::from(args.next().context(USAGE)?);
    let scenario_path = args.next().map(PathBuf::from);

    let config = load_config(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    info!("pointer-sim starting with {}", config_path.display());

    let listener = Arc::new(RecordingInputListener::new());
    let policy = Arc::new(HeadlessPolicy::new());
    let feed = Arc::new(StaticWindowInfosFeed::default());
    let choreographer = PointerChoreographer::new(
        listener.clone(),
        policy.clone(),
        feed.clone(),
        config.features,
    );

    apply_config(&choreographer, &config)?;

    if let Some(path) = scenario_path {
        let scenario = load_scenario(&path)
            .with_context(|| format!("loading scenario {}", path.display()))?;
        info!("replaying {} scenario step(s)", scenario.steps.len());
        let device_displays = config.device_displays();
        for step in &scenario.steps {
            run_step(step, &choreographer, &feed, &device_displays);
        }
    }

    print!("{}", choreographer.dump());
    info!(
        forwarded = listener.len(),
        controllers_created = policy.controllers().len(),
        display_changes = policy.display_changes().len(),
        "simulation finished"
    );
    Ok(())
}

/// Pushes the static configuration into a fresh choreographer.
fn apply_config(choreographer: &PointerChoreographer, config: &SimulatorConfig) -> anyhow::Result<()> {
    if let Some(topology) = config.display_topology().context("building display topology")? {
        choreographer.set_display_topology(topology);
    }
    choreographer.set_display_viewports(config.viewports());
    choreographer.set_show_touches_enabled(config.pointer.show_touches);
    choreographer.set_stylus_pointer_icon_enabled(config.pointer.stylus_pointer_icon);
    choreographer.set_default_mouse_display_id(config.default_mouse_display_id());
    choreographer.notify_input_devices_changed(InputDevicesChangedArgs {
        devices: config.input_devices(),
    });
    Ok(())
}
