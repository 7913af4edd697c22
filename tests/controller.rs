//! Timing behaviour of the exercise controller under paused tokio time

use std::sync::Arc;
use std::time::Duration;

use clay_buster::exercise::ExercisePhase;
use clay_buster::host::{AssetSpec, HeadlessHost, TargetHandle, TargetHost};
use clay_buster::sim::VelocitySampler;
use clay_buster::{ExerciseConfig, ExerciseController, ExerciseError, ShotEvent};
use glam::DVec2;
use tokio::time::sleep;

const ZERO: &str = "Broken Clays: 0\nMissed Clays: 0\nShots: 0";

fn host(perspective: bool) -> Arc<HeadlessHost> {
    let config = ExerciseConfig::default();
    Arc::new(
        HeadlessHost::new(960.0, 718.0)
            .with_asset(config.left_clay_asset, AssetSpec::CLAY)
            .with_asset(config.right_clay_asset, AssetSpec::CLAY)
            .with_perspective(perspective),
    )
}

fn start(host: &Arc<HeadlessHost>, seed: u64) -> ExerciseController {
    start_with(ExerciseConfig::default(), host, seed)
}

fn start_with(config: ExerciseConfig, host: &Arc<HeadlessHost>, seed: u64) -> ExerciseController {
    let sampler = VelocitySampler::seeded(seed, &config);
    ExerciseController::start_with_sampler(config, Arc::clone(host), sampler).unwrap()
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn test_first_clay_after_launch_delay() {
    let host = host(false);
    let controller = start(&host, 1);
    assert_eq!(host.last_text().as_deref(), Some(ZERO));
    assert_eq!(controller.metadata().name, "Clay Buster");

    sleep(ms(2_950)).await;
    assert_eq!(controller.snapshot().await.unwrap().visible_clays, 0);

    sleep(ms(100)).await;
    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.visible_clays, 1);
    assert_eq!(snapshot.phase, ExercisePhase::Running);
    assert_eq!(host.added_count(), 1);

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_motion_ticks_move_clay() {
    let host = host(false);
    let controller = start(&host, 2);

    sleep(ms(3_050)).await;
    let target = host.live_targets()[0];
    let before = host.position(target);

    sleep(ms(300)).await;
    let after = host.position(target);
    assert!(after.y < before.y, "clay should climb: {before} -> {after}");

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_hit_released_after_grace() {
    let host = host(false);
    let controller = start(&host, 3);

    sleep(ms(3_050)).await;
    let target = host.live_targets()[0];
    let aim = host.center_of(target).unwrap();

    controller.on_shot(ShotEvent::hit(aim, target)).unwrap();
    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.visible_clays, 0);
    assert_eq!(snapshot.score.hit_clays, 1);
    assert_eq!(snapshot.score.shots, 1);
    assert_eq!(
        host.last_text().as_deref(),
        Some("Broken Clays: 1\nMissed Clays: 0\nShots: 1")
    );

    // Hit animation window
    assert!(host.is_rendered(target));
    sleep(ms(400)).await;
    assert!(host.is_rendered(target));
    assert_eq!(host.removal_count(target), 0);

    sleep(ms(200)).await;
    assert!(!host.is_rendered(target));
    assert_eq!(host.removal_count(target), 1);

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shot_on_unknown_target() {
    let host = host(false);
    let controller = start(&host, 4);
    sleep(ms(3_050)).await;

    controller
        .on_shot(ShotEvent::hit(DVec2::ZERO, TargetHandle(4242)))
        .unwrap();
    controller.on_shot(ShotEvent::miss(DVec2::ZERO)).unwrap();

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.score.shots, 2);
    assert_eq!(snapshot.score.hit_clays, 0);
    assert_eq!(snapshot.visible_clays, 1);

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_and_restarts_cadence() {
    let host = host(false);
    let controller = start(&host, 5);

    sleep(ms(6_050)).await;
    controller.on_shot(ShotEvent::miss(DVec2::ZERO)).unwrap();
    assert!(controller.snapshot().await.unwrap().score.shots > 0);

    controller.reset().unwrap();
    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.visible_clays, 0);
    assert_eq!(snapshot.score.hit_clays, 0);
    assert_eq!(snapshot.score.missed_clays, 0);
    assert_eq!(snapshot.score.shots, 0);
    assert_eq!(host.last_text().as_deref(), Some(ZERO));
    assert!(host.live_targets().is_empty());

    // Next launch is a full delay after the reset, not on the old beat
    sleep(ms(2_900)).await;
    assert_eq!(controller.snapshot().await.unwrap().visible_clays, 0);
    sleep(ms(200)).await;
    assert_eq!(controller.snapshot().await.unwrap().visible_clays, 1);

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_destroy_stops_all_callbacks() {
    let host = host(false);
    let controller = start(&host, 6);

    sleep(ms(3_050)).await;
    let target = host.live_targets()[0];
    controller.on_shot(ShotEvent::hit(DVec2::ZERO, target)).unwrap();
    controller.snapshot().await.unwrap();

    controller.destroy().await.unwrap();
    let texts = host.texts().len();
    let added = host.added_count();

    sleep(ms(10_000)).await;

    // Pending release was dropped; no launches, ticks or score updates
    assert!(host.is_rendered(target));
    assert_eq!(host.removal_count(target), 0);
    assert_eq!(host.added_count(), added);
    assert_eq!(host.texts().len(), texts);
}

#[tokio::test(start_paused = true)]
async fn test_missing_asset_aborts_startup() {
    let host = Arc::new(HeadlessHost::new(960.0, 718.0));
    let result = ExerciseController::start(ExerciseConfig::default(), host.clone());
    assert!(matches!(result, Err(ExerciseError::MissingAsset { .. })));
    assert!(host.texts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_asset_lost_while_running_is_fatal() {
    let host = host(false);
    let controller = start(&host, 7);
    assert!(controller.is_running());

    let config = ExerciseConfig::default();
    host.remove_asset(&config.left_clay_asset);
    host.remove_asset(&config.right_clay_asset);

    sleep(ms(3_050)).await;
    assert!(!controller.is_running());
    assert!(matches!(
        controller.on_shot(ShotEvent::miss(DVec2::ZERO)),
        Err(ExerciseError::NotRunning)
    ));
    assert!(matches!(
        controller.destroy().await,
        Err(ExerciseError::MissingAsset { .. })
    ));
}

#[test]
fn test_start_outside_runtime_fails() {
    let host = host(false);
    let result = ExerciseController::start(ExerciseConfig::default(), Arc::clone(&host));
    assert!(matches!(result, Err(ExerciseError::NoRuntime(_))));

    // Nothing was initialised on the host
    assert!(host.texts().is_empty());
    assert!(host.background().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_fatal_launch_releases_pending_hits() {
    let host = host(false);
    let config = ExerciseConfig {
        hit_grace_ms: 5_000,
        ..Default::default()
    };
    let controller = start_with(config.clone(), &host, 9);

    sleep(ms(3_050)).await;
    let target = host.live_targets()[0];
    controller.on_shot(ShotEvent::hit(DVec2::ZERO, target)).unwrap();
    assert_eq!(controller.snapshot().await.unwrap().score.hit_clays, 1);
    assert!(host.is_rendered(target));

    host.remove_asset(&config.left_clay_asset);
    host.remove_asset(&config.right_clay_asset);

    // Next launch at 6 s fails long before the grace period ends
    sleep(ms(3_000)).await;
    assert!(!controller.is_running());
    assert!(!host.is_rendered(target));
    assert_eq!(host.removal_count(target), 1);
    assert!(matches!(
        controller.destroy().await,
        Err(ExerciseError::MissingAsset { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shot_burst_does_not_delay_motion() {
    let host = host(false);
    // Clays launch between motion ticks and fall below the minimum width
    // on their first tick
    let config = ExerciseConfig {
        launch_delay_ms: 3_050,
        min_clay_width: 1_000.0,
        ..Default::default()
    };
    let controller = start_with(config, &host, 10);

    sleep(ms(3_060)).await;
    assert_eq!(controller.snapshot().await.unwrap().visible_clays, 1);

    for _ in 0..1_000 {
        controller.on_shot(ShotEvent::miss(DVec2::ZERO)).unwrap();
    }
    // Motion tick at 3.1 s is due while the shots are still queued
    tokio::time::advance(ms(100)).await;

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.score.shots, 1_000);
    assert_eq!(snapshot.score.missed_clays, 1);
    assert_eq!(snapshot.visible_clays, 0);

    controller.destroy().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_clay_counted_twice() {
    let host = host(true);
    let controller = start(&host, 8);

    let mut shots = 0;
    for i in 0..300u64 {
        sleep(ms(137)).await;
        let live = host.live_targets();
        if live.is_empty() {
            continue;
        }
        // Re-shoot targets that may already be broken and awaiting removal
        let target = live[(i as usize) % live.len()];
        controller.on_shot(ShotEvent::hit(DVec2::ZERO, target)).unwrap();
        shots += 1;
    }
    // Let pending releases fire
    sleep(ms(600)).await;

    let snapshot = controller.snapshot().await.unwrap();
    let added = host.added_count();
    assert!(added > 10);
    assert_eq!(snapshot.score.shots, shots);
    assert_eq!(
        u64::from(snapshot.score.hit_clays + snapshot.score.missed_clays) + snapshot.visible_clays as u64,
        added
    );
    for handle in 1..=added {
        assert!(host.removal_count(TargetHandle(handle)) <= 1);
    }

    controller.destroy().await.unwrap();
}
