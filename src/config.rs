//! Exercise configuration
//!
//! Defaults reproduce the stock Clay Buster exercise. A JSON file can override
//! any subset of fields.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{ExerciseError, Result};

/// Inclusive integer range for per-clay velocity sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: i32,
    pub max: i32,
}

impl SpeedRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        self.as_range().contains(&value)
    }
}

/// Everything that shapes a Clay Buster run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    // === Cadences ===
    /// Delay between clay launches
    pub launch_delay_ms: u64,
    /// Motion tick period
    pub motion_tick_ms: u64,
    /// Time a hit clay stays rendered so the host can play its hit animation
    pub hit_grace_ms: u64,

    // === Arena ===
    /// Background image shown behind the clays
    pub background_asset: String,
    /// Resolution the bunker coordinates are expressed in
    pub reference_width: f64,
    pub reference_height: f64,
    /// Bunker position on the reference background
    pub bunker_x: i32,
    pub bunker_y: i32,

    // === Clays ===
    /// Target used for clays flying left
    pub left_clay_asset: String,
    /// Target used for clays flying right
    pub right_clay_asset: String,
    /// Horizontal speed magnitude, pixels per tick
    pub speed_x: SpeedRange,
    /// Vertical speed, pixels per tick (upwards)
    pub speed_y: SpeedRange,
    /// Initial bank angle magnitude (degrees)
    pub launch_angle: f64,
    /// Bank added every tick (degrees)
    pub bank_per_tick: f64,
    /// Simulated distance gained per tick is `dy * distance_step`
    pub distance_step: i32,
    /// Clays rendered narrower than this count as gone
    pub min_clay_width: f64,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            launch_delay_ms: 3_000,
            motion_tick_ms: 100,
            hit_grace_ms: 500,

            background_asset: "background/shotgun_range.gif".to_string(),
            reference_width: 1920.0,
            reference_height: 1436.0,
            bunker_x: 750,
            bunker_y: 560,

            left_clay_asset: "@clays/Clay_left.target".to_string(),
            right_clay_asset: "@clays/Clay_right.target".to_string(),
            speed_x: SpeedRange::new(3, 7),
            speed_y: SpeedRange::new(5, 20),
            launch_angle: 10.0,
            bank_per_tick: 1.0,
            distance_step: 10,
            min_clay_width: 10.0,
        }
    }
}

impl ExerciseConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded exercise config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject configs the engine cannot run
    pub fn validate(&self) -> Result<()> {
        if self.launch_delay_ms == 0 || self.motion_tick_ms == 0 {
            return Err(ExerciseError::InvalidConfig(
                "launch delay and motion tick must be non-zero".to_string(),
            ));
        }
        for (name, range) in [("speed_x", self.speed_x), ("speed_y", self.speed_y)] {
            if range.min > range.max {
                return Err(ExerciseError::InvalidConfig(format!(
                    "{name} min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.speed_x.min < 0 {
            return Err(ExerciseError::InvalidConfig(
                "speed_x is a magnitude and must not be negative".to_string(),
            ));
        }
        if self.speed_y.min <= 0 {
            return Err(ExerciseError::InvalidConfig(
                "speed_y is upward speed and must be positive".to_string(),
            ));
        }
        if self.distance_step < 0 {
            return Err(ExerciseError::InvalidConfig(
                "distance_step must not be negative".to_string(),
            ));
        }
        if self.min_clay_width.is_nan() || self.min_clay_width < 0.0 {
            return Err(ExerciseError::InvalidConfig(
                "min_clay_width must not be negative".to_string(),
            ));
        }
        if self.reference_width <= 0.0 || self.reference_height <= 0.0 {
            return Err(ExerciseError::InvalidConfig(
                "reference resolution must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.launch_delay_ms)
    }

    pub fn motion_tick(&self) -> Duration {
        Duration::from_millis(self.motion_tick_ms)
    }

    pub fn hit_grace(&self) -> Duration {
        Duration::from_millis(self.hit_grace_ms)
    }

    /// Bunker position rescaled from the reference background to the arena.
    /// Coordinates truncate to whole pixels.
    pub fn scaled_bunker(&self, arena_width: f64, arena_height: f64) -> DVec2 {
        let scale_x = arena_width / self.reference_width;
        let scale_y = arena_height / self.reference_height;
        DVec2::new(
            (f64::from(self.bunker_x) * scale_x).trunc(),
            (f64::from(self.bunker_y) * scale_y).trunc(),
        )
    }
}
