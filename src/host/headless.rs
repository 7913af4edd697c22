//! In-memory host
//!
//! Keeps target geometry in a map instead of a scene graph. Used by the demo
//! binary and by tests, which inspect removal counts and the overlay history.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};

use glam::DVec2;

use super::{
    DisplayHost, TAG_DEFAULT_PERCEIVED_DISTANCE, TAG_DEFAULT_PERCEIVED_HEIGHT,
    TAG_DEFAULT_PERCEIVED_WIDTH, TargetHandle, TargetHost,
};

/// Default geometry of a loadable target asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub width: i32,
    pub height: i32,
    pub distance: i32,
}

impl AssetSpec {
    /// Geometry of the stock clay targets
    pub const CLAY: AssetSpec = AssetSpec {
        width: 40,
        height: 20,
        distance: 2_000,
    };
}

#[derive(Debug, Clone)]
struct RenderedTarget {
    spec: AssetSpec,
    position: DVec2,
    dimension: DVec2,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_handle: u64,
    assets: HashMap<String, AssetSpec>,
    targets: HashMap<TargetHandle, RenderedTarget>,
    removals: HashMap<TargetHandle, u32>,
    texts: Vec<String>,
    background: Option<String>,
}

/// Headless [`TargetHost`] + [`DisplayHost`]
#[derive(Debug)]
pub struct HeadlessHost {
    width: f64,
    height: f64,
    perspective: AtomicBool,
    state: Mutex<HeadlessState>,
}

impl HeadlessHost {
    /// Empty arena of the given size, no assets, perspective off
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            perspective: AtomicBool::new(false),
            state: Mutex::new(HeadlessState {
                next_handle: 1,
                ..Default::default()
            }),
        }
    }

    /// Register a loadable asset
    pub fn with_asset(self, asset: impl Into<String>, spec: AssetSpec) -> Self {
        self.lock().assets.insert(asset.into(), spec);
        self
    }

    /// Make an asset unloadable from now on
    pub fn remove_asset(&self, asset: &str) {
        self.lock().assets.remove(asset);
    }

    pub fn with_perspective(self, enabled: bool) -> Self {
        self.set_perspective(enabled);
        self
    }

    pub fn set_perspective(&self, enabled: bool) {
        self.perspective.store(enabled, Ordering::Relaxed);
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Targets currently rendered, sorted by handle
    pub fn live_targets(&self) -> Vec<TargetHandle> {
        let mut handles: Vec<_> = self.lock().targets.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Number of targets ever added
    pub fn added_count(&self) -> u64 {
        self.lock().next_handle - 1
    }

    pub fn is_rendered(&self, target: TargetHandle) -> bool {
        self.lock().targets.contains_key(&target)
    }

    /// How many times `remove_target` was called for this handle
    pub fn removal_count(&self, target: TargetHandle) -> u32 {
        self.lock().removals.get(&target).copied().unwrap_or(0)
    }

    /// Most recent overlay text
    pub fn last_text(&self) -> Option<String> {
        self.lock().texts.last().cloned()
    }

    /// Every overlay text shown so far
    pub fn texts(&self) -> Vec<String> {
        self.lock().texts.clone()
    }

    pub fn background(&self) -> Option<String> {
        self.lock().background.clone()
    }

    /// Topmost target whose bounding box contains `point`
    pub fn hit_test(&self, point: DVec2) -> Option<TargetHandle> {
        let state = self.lock();
        state
            .targets
            .iter()
            .filter(|(_, t)| {
                let max = t.position + t.dimension;
                point.cmpge(t.position).all() && point.cmple(max).all()
            })
            .map(|(handle, _)| *handle)
            .max()
    }

    /// Centre of a rendered target's bounding box
    pub fn center_of(&self, target: TargetHandle) -> Option<DVec2> {
        self.lock()
            .targets
            .get(&target)
            .map(|t| t.position + t.dimension * 0.5)
    }
}

impl TargetHost for HeadlessHost {
    fn add_target(&self, asset: &str, position: DVec2) -> Option<TargetHandle> {
        let mut state = self.lock();
        let spec = *state.assets.get(asset)?;
        let handle = TargetHandle(state.next_handle);
        state.next_handle += 1;
        state.targets.insert(
            handle,
            RenderedTarget {
                spec,
                position,
                dimension: DVec2::new(f64::from(spec.width), f64::from(spec.height)),
            },
        );
        Some(handle)
    }

    fn asset_exists(&self, asset: &str) -> bool {
        self.lock().assets.contains_key(asset)
    }

    fn set_position(&self, target: TargetHandle, position: DVec2) {
        if let Some(t) = self.lock().targets.get_mut(&target) {
            t.position = position;
        }
    }

    fn position(&self, target: TargetHandle) -> DVec2 {
        self.lock()
            .targets
            .get(&target)
            .map(|t| t.position)
            .unwrap_or(DVec2::ZERO)
    }

    fn dimension(&self, target: TargetHandle) -> DVec2 {
        self.lock()
            .targets
            .get(&target)
            .map(|t| t.dimension)
            .unwrap_or(DVec2::ZERO)
    }

    fn rescale_by_distance(
        &self,
        target: TargetHandle,
        default_width: i32,
        default_height: i32,
        distance: i32,
    ) {
        if let Some(t) = self.lock().targets.get_mut(&target) {
            // Apparent size falls off linearly with distance
            let scale = f64::from(t.spec.distance) / f64::from(distance.max(1));
            t.dimension = DVec2::new(f64::from(default_width), f64::from(default_height)) * scale;
        }
    }

    fn remove_target(&self, target: TargetHandle) {
        let mut state = self.lock();
        *state.removals.entry(target).or_insert(0) += 1;
        if state.targets.remove(&target).is_none() {
            log::warn!("Removing unknown target {:?}", target);
        }
    }

    fn tag(&self, target: TargetHandle, key: &str) -> Option<String> {
        let state = self.lock();
        let spec = state.targets.get(&target)?.spec;
        let value = match key {
            TAG_DEFAULT_PERCEIVED_WIDTH => spec.width,
            TAG_DEFAULT_PERCEIVED_HEIGHT => spec.height,
            TAG_DEFAULT_PERCEIVED_DISTANCE => spec.distance,
            _ => return None,
        };
        Some(value.to_string())
    }
}

impl DisplayHost for HeadlessHost {
    fn show_text(&self, text: &str) {
        self.lock().texts.push(text.to_string());
    }

    fn set_background(&self, asset: &str) {
        self.lock().background = Some(asset.to_string());
    }

    fn arena_width(&self) -> f64 {
        self.width
    }

    fn arena_height(&self) -> f64 {
        self.height
    }

    fn is_perspective_initialized(&self) -> bool {
        self.perspective.load(Ordering::Relaxed)
    }
}
