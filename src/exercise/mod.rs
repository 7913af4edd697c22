//! Clay Buster exercise
//!
//! [`ClayBuster`] is the whole exercise as plain synchronous methods: launch a
//! clay, run a motion tick, take a shot, reset. It owns the registry and the
//! score, so whoever owns the engine serialises every mutation.
//! [`ExerciseController`] is that owner at runtime: a tokio task firing the
//! launch and motion cadences and the delayed removal of hit clays.

pub mod controller;

pub use controller::ExerciseController;

use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::ExerciseConfig;
use crate::error::{ExerciseError, Result};
use crate::host::{ExerciseHost, ShotEvent, TargetHandle};
use crate::metadata::ExerciseMetadata;
use crate::sim::{Clay, ClayContext, ClayId, ClayRegistry, ScoreTracker, VelocitySampler};

/// Lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExercisePhase {
    /// Constructed, `init` not yet called
    Idle,
    /// Launching and moving clays
    Running,
    /// Destroyed; every further call is a no-op
    Stopped,
}

/// Observable state of a running exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSnapshot {
    pub phase: ExercisePhase,
    pub score: ScoreTracker,
    pub visible_clays: usize,
}

/// The exercise engine
pub struct ClayBuster<H: ?Sized> {
    config: ExerciseConfig,
    host: Arc<H>,
    sampler: VelocitySampler,
    registry: ClayRegistry,
    score: ScoreTracker,
    bunker: DVec2,
    phase: ExercisePhase,
}

impl<H: ExerciseHost + ?Sized> ClayBuster<H> {
    pub fn new(config: ExerciseConfig, host: Arc<H>, sampler: VelocitySampler) -> Self {
        Self {
            config,
            host,
            sampler,
            registry: ClayRegistry::new(),
            score: ScoreTracker::new(),
            bunker: DVec2::ZERO,
            phase: ExercisePhase::Idle,
        }
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn metadata(&self) -> ExerciseMetadata {
        ExerciseMetadata::for_config(&self.config)
    }

    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    pub fn score(&self) -> ScoreTracker {
        self.score
    }

    pub fn registry(&self) -> &ClayRegistry {
        &self.registry
    }

    /// Bunker position in arena coordinates (valid after `init`)
    pub fn bunker(&self) -> DVec2 {
        self.bunker
    }

    pub fn snapshot(&self) -> ExerciseSnapshot {
        ExerciseSnapshot {
            phase: self.phase,
            score: self.score,
            visible_clays: self.registry.len(),
        }
    }

    /// Set up the arena and publish the zero score.
    ///
    /// Both clay assets are checked up front so a broken deployment fails
    /// here instead of on the first launch.
    pub fn init(&mut self) -> Result<()> {
        for asset in [&self.config.left_clay_asset, &self.config.right_clay_asset] {
            if !self.host.asset_exists(asset) {
                log::error!("Clay target {} is missing, not starting", asset);
                return Err(ExerciseError::MissingAsset {
                    asset: asset.clone(),
                });
            }
        }

        self.host.set_background(&self.config.background_asset);

        let (width, height) = (self.host.arena_width(), self.host.arena_height());
        self.bunker = self.config.scaled_bunker(width, height);
        log::info!(
            "Clay Buster started: arena {}x{}, bunker at ({}, {})",
            width,
            height,
            self.bunker.x,
            self.bunker.y
        );

        self.publish_score();
        self.phase = ExercisePhase::Running;
        Ok(())
    }

    /// Launch one clay from the bunker. `Ok(None)` when not running.
    pub fn launch_clay(&mut self) -> Result<Option<ClayId>> {
        if self.phase != ExercisePhase::Running {
            return Ok(None);
        }

        let flight = self.sampler.sample();
        let id = self.registry.next_clay_id();
        let clay = Clay::launch(id, &*self.host, self.bunker, flight, &self.config)?;
        log::debug!(
            "Launched clay {} {:?} dx={} dy={}",
            id.0,
            flight.direction,
            flight.dx,
            flight.dy
        );
        self.registry.insert(clay);
        Ok(Some(id))
    }

    /// One motion tick. Returns the number of clays missed this tick.
    pub fn move_clays(&mut self) -> usize {
        if self.phase != ExercisePhase::Running {
            return 0;
        }

        let ctx = ClayContext::capture(&*self.host, &self.config);
        let missed = self.registry.advance_all(&ctx);

        for clay in &missed {
            self.score.record_miss();
            self.host.remove_target(clay.target());
            log::debug!("Clay {} missed", clay.id().0);
        }

        if !missed.is_empty() {
            self.publish_score();
        }
        missed.len()
    }

    /// Score a shot.
    ///
    /// A hit on a visible clay takes it out of the registry at once and
    /// returns its target, which the caller removes via [`release_target`]
    /// once the hit grace period has passed.
    ///
    /// [`release_target`]: Self::release_target
    pub fn on_shot(&mut self, shot: &ShotEvent) -> Option<TargetHandle> {
        if self.phase != ExercisePhase::Running {
            return None;
        }

        let broken = shot
            .hit
            .and_then(|hit| self.registry.remove_by_target(hit.target));

        if let Some(clay) = &broken {
            self.score.record_hit();
            log::info!(
                "Clay {} broken at ({:.0}, {:.0})",
                clay.id().0,
                shot.position.x,
                shot.position.y
            );
        }

        self.score.record_shot();
        self.publish_score();
        broken.map(|clay| clay.target())
    }

    /// Remove a hit clay's target once its grace period is over
    pub fn release_target(&self, target: TargetHandle) {
        if self.phase == ExercisePhase::Stopped {
            return;
        }
        self.host.remove_target(target);
    }

    /// Zero the score and clear every visible clay
    pub fn reset(&mut self) {
        if self.phase == ExercisePhase::Stopped {
            return;
        }

        self.score.reset();
        for clay in self.registry.drain() {
            self.host.remove_target(clay.target());
        }
        self.publish_score();
        log::info!("Clay Buster reset");
    }

    /// Stop for good. Later calls change nothing.
    pub fn shutdown(&mut self) {
        if self.phase != ExercisePhase::Stopped {
            self.phase = ExercisePhase::Stopped;
            log::info!("Clay Buster destroyed");
        }
    }

    fn publish_score(&self) {
        self.host.show_text(&self.score.status_text());
    }
}
