//! A single clay in flight
//!
//! Each tick the clay's forward step `(dx, -dy)` is rotated by its accumulated
//! bank angle around its current position. The bank grows by a fixed step per
//! tick, which bends the straight launch line into an arc.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::sampler::{Direction, Flight};
use crate::config::ExerciseConfig;
use crate::error::{ExerciseError, Result};
use crate::host::{
    DisplayHost, TAG_DEFAULT_PERCEIVED_DISTANCE, TAG_DEFAULT_PERCEIVED_HEIGHT,
    TAG_DEFAULT_PERCEIVED_WIDTH, TargetHandle, TargetHost,
};
use crate::rotate_about;

/// Registry-assigned clay identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClayId(pub u32);

/// Read-only view of the host a clay needs while moving
pub struct ClayContext<'a, H: ?Sized> {
    pub host: &'a H,
    pub config: &'a ExerciseConfig,
    pub arena_width: f64,
    pub perspective: bool,
}

impl<'a, H: TargetHost + DisplayHost + ?Sized> ClayContext<'a, H> {
    /// Snapshot arena width and perspective state for one motion tick
    pub fn capture(host: &'a H, config: &'a ExerciseConfig) -> Self {
        Self {
            host,
            config,
            arena_width: host.arena_width(),
            perspective: host.is_perspective_initialized(),
        }
    }
}

fn read_tag<H: TargetHost + ?Sized>(
    host: &H,
    target: TargetHandle,
    asset: &str,
    key: &'static str,
) -> Result<i32> {
    let value = host.tag(target, key).ok_or_else(|| ExerciseError::MissingTag {
        asset: asset.to_string(),
        key,
    })?;
    value
        .trim()
        .parse()
        .map_err(|_| ExerciseError::InvalidTag { key, value })
}

/// Default (width, height, distance) tags of a freshly added target
fn read_default_tags<H: TargetHost + ?Sized>(
    host: &H,
    target: TargetHandle,
    asset: &str,
) -> Result<(i32, i32, i32)> {
    Ok((
        read_tag(host, target, asset, TAG_DEFAULT_PERCEIVED_WIDTH)?,
        read_tag(host, target, asset, TAG_DEFAULT_PERCEIVED_HEIGHT)?,
        read_tag(host, target, asset, TAG_DEFAULT_PERCEIVED_DISTANCE)?,
    ))
}

/// Kinematic state of one launched clay
#[derive(Debug, Clone)]
pub struct Clay {
    id: ClayId,
    direction: Direction,
    /// Bank angle in degrees
    angle: f64,
    dx: i32,
    dy: i32,
    position: DVec2,
    target: TargetHandle,
    default_width: i32,
    default_height: i32,
    distance: i32,
}

impl Clay {
    /// Place a new clay target at the bunker.
    ///
    /// A missing asset or unreadable size tags are deployment errors and
    /// abort the launch.
    pub fn launch<H: TargetHost + ?Sized>(
        id: ClayId,
        host: &H,
        bunker: DVec2,
        flight: Flight,
        config: &ExerciseConfig,
    ) -> Result<Self> {
        let asset = match flight.direction {
            Direction::Left => &config.left_clay_asset,
            Direction::Right => &config.right_clay_asset,
        };
        let target = host
            .add_target(asset, bunker)
            .ok_or_else(|| ExerciseError::MissingAsset {
                asset: asset.clone(),
            })?;

        let (default_width, default_height, distance) =
            match read_default_tags(host, target, asset) {
                Ok(tags) => tags,
                Err(err) => {
                    // Don't leave a half-built clay on screen
                    host.remove_target(target);
                    return Err(err);
                }
            };

        Ok(Self {
            id,
            direction: flight.direction,
            angle: config.launch_angle * f64::from(flight.direction.sign()),
            dx: flight.dx,
            dy: flight.dy,
            position: bunker,
            target,
            default_width,
            default_height,
            distance,
        })
    }

    pub fn id(&self) -> ClayId {
        self.id
    }

    pub fn target(&self) -> TargetHandle {
        self.target
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Per-tick velocity `(dx, dy)`
    pub fn velocity(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    /// Move one tick. Returns `false` once the clay is off screen or has
    /// shrunk below the minimum width.
    pub fn advance<H: TargetHost + ?Sized>(&mut self, ctx: &ClayContext<'_, H>) -> bool {
        self.angle += ctx.config.bank_per_tick * f64::from(self.direction.sign());

        // The displaced point and the pivot share the pre-move position
        let pivot = self.position;
        let displaced = pivot + DVec2::new(f64::from(self.dx), -f64::from(self.dy));
        self.position = rotate_about(displaced, pivot, self.angle);
        ctx.host.set_position(self.target, self.position);

        if ctx.perspective {
            self.distance += self.dy * ctx.config.distance_step;
            ctx.host.rescale_by_distance(
                self.target,
                self.default_width,
                self.default_height,
                self.distance,
            );
        }

        // Host may nudge the target while rescaling
        let pos = ctx.host.position(self.target);
        let size = ctx.host.dimension(self.target);

        pos.x + size.x > 0.0
            && pos.x < ctx.arena_width
            && pos.y + size.y > 0.0
            && size.x > ctx.config.min_clay_width
    }

    /// Teleport the clay (and its target)
    pub fn place<H: TargetHost + ?Sized>(&mut self, host: &H, position: DVec2) {
        self.position = position;
        host.set_position(self.target, position);
    }
}
