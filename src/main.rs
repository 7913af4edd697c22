//! Clay Buster headless runner
//!
//! Runs the exercise against the in-memory host with a simulated shooter and
//! prints the final score as JSON.
//!
//! Usage: `clay-buster [config.json] [seconds]`

use std::sync::Arc;
use std::time::Duration;

use clay_buster::host::{AssetSpec, HeadlessHost};
use clay_buster::{ExerciseConfig, ExerciseController, ShotEvent};
use glam::DVec2;
use rand::Rng;

const ARENA_WIDTH: f64 = 1280.0;
const ARENA_HEIGHT: f64 = 720.0;
const DEFAULT_RUN_SECS: u64 = 20;
const TRIGGER_INTERVAL: Duration = Duration::from_millis(700);

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> clay_buster::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ExerciseConfig::load(path)?,
        None => ExerciseConfig::default(),
    };
    let run_secs = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RUN_SECS);

    let host = Arc::new(
        HeadlessHost::new(ARENA_WIDTH, ARENA_HEIGHT)
            .with_asset(config.left_clay_asset.clone(), AssetSpec::CLAY)
            .with_asset(config.right_clay_asset.clone(), AssetSpec::CLAY)
            .with_perspective(true),
    );

    let controller = ExerciseController::start(config, Arc::clone(&host))?;
    log::info!(
        "{} v{} by {}: {}",
        controller.metadata().name,
        controller.metadata().version,
        controller.metadata().author,
        controller.metadata().description
    );
    log::info!("Running for {} seconds", run_secs);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(run_secs);
    let mut trigger = tokio::time::interval(TRIGGER_INTERVAL);
    let mut rng = rand::rng();

    while tokio::time::Instant::now() < deadline {
        trigger.tick().await;

        // Aim at a random live clay with some wobble; the host resolves hits
        let live = host.live_targets();
        let aim = match live.get(rng.random_range(0..live.len().max(1))) {
            Some(&target) => host.center_of(target).unwrap_or(DVec2::ZERO),
            None => continue,
        };
        let wobble = DVec2::new(rng.random_range(-25.0..25.0), rng.random_range(-25.0..25.0));
        let point = aim + wobble;

        let shot = match host.hit_test(point) {
            Some(target) => ShotEvent::hit(point, target),
            None => ShotEvent::miss(point),
        };
        if controller.on_shot(shot).is_err() {
            // Exercise stopped on its own; destroy reports why
            break;
        }
    }

    let snapshot = controller.snapshot().await;
    controller.destroy().await?;
    let snapshot = snapshot?;

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("Could not encode final score: {}", err),
    }
    Ok(())
}
