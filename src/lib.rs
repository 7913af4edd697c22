//! Clay Buster - clay pigeon launcher for projector shooting exercises
//!
//! Core modules:
//! - `sim`: Clay kinematics, registry and score (no timers)
//! - `exercise`: Exercise engine and the timed controller driving it
//! - `host`: Interfaces to the rendering host, plus a headless implementation
//! - `config`: Tunable cadences, assets and velocity ranges

pub mod config;
pub mod error;
pub mod exercise;
pub mod host;
pub mod metadata;
pub mod sim;

pub use config::ExerciseConfig;
pub use error::{ExerciseError, Result};
pub use exercise::{ClayBuster, ExerciseController, ExerciseSnapshot};
pub use host::{ExerciseHost, HeadlessHost, ShotEvent, TargetHandle};
pub use metadata::ExerciseMetadata;

use glam::DVec2;

/// Rotate `point` by `degrees` about `pivot` (screen coordinates, y down)
#[inline]
pub fn rotate_about(point: DVec2, pivot: DVec2, degrees: f64) -> DVec2 {
    DVec2::from_angle(degrees.to_radians()).rotate(point - pivot) + pivot
}
