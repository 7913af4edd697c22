//! Host collaborator interfaces
//!
//! The exercise never draws anything itself. It asks the host to place, move,
//! resize and remove targets, and to show a text overlay. Hit-testing is also
//! the host's job: shots arrive already resolved to the target they hit.
//!
//! Host methods take `&self` because the host is shared with whatever renders
//! the arena; implementations use interior mutability.

pub mod headless;

pub use headless::{AssetSpec, HeadlessHost};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Tag holding a target's default rendered width
pub const TAG_DEFAULT_PERCEIVED_WIDTH: &str = "_default_perceived_width";
/// Tag holding a target's default rendered height
pub const TAG_DEFAULT_PERCEIVED_HEIGHT: &str = "_default_perceived_height";
/// Tag holding a target's default simulated distance
pub const TAG_DEFAULT_PERCEIVED_DISTANCE: &str = "_default_perceived_distance";

/// Opaque reference to a target rendered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetHandle(pub u64);

/// Target placement and geometry
pub trait TargetHost: Send + Sync {
    /// Add a target at `position`. `None` when the asset cannot be loaded.
    fn add_target(&self, asset: &str, position: DVec2) -> Option<TargetHandle>;

    /// Whether `asset` could be loaded, without adding anything
    fn asset_exists(&self, asset: &str) -> bool;

    fn set_position(&self, target: TargetHandle, position: DVec2);

    fn position(&self, target: TargetHandle) -> DVec2;

    /// Current rendered (width, height)
    fn dimension(&self, target: TargetHandle) -> DVec2;

    /// Resize from the default size as seen from `distance`
    fn rescale_by_distance(
        &self,
        target: TargetHandle,
        default_width: i32,
        default_height: i32,
        distance: i32,
    );

    fn remove_target(&self, target: TargetHandle);

    fn tag(&self, target: TargetHandle, key: &str) -> Option<String>;
}

/// Arena surface and text overlay
pub trait DisplayHost: Send + Sync {
    fn show_text(&self, text: &str);

    fn set_background(&self, asset: &str);

    fn arena_width(&self) -> f64;

    fn arena_height(&self) -> f64;

    /// Whether distance-based rescaling is calibrated
    fn is_perspective_initialized(&self) -> bool;
}

/// Everything the exercise needs from its host
pub trait ExerciseHost: TargetHost + DisplayHost {}

impl<T: TargetHost + DisplayHost> ExerciseHost for T {}

/// Target a shot landed on, as resolved by the host's hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitInfo {
    pub target: TargetHandle,
}

/// A shot detected by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub position: DVec2,
    pub hit: Option<HitInfo>,
}

impl ShotEvent {
    pub fn miss(position: DVec2) -> Self {
        Self { position, hit: None }
    }

    pub fn hit(position: DVec2, target: TargetHandle) -> Self {
        Self {
            position,
            hit: Some(HitInfo { target }),
        }
    }
}
