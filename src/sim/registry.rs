//! The set of clays currently in the air
//!
//! Clays are kept sorted by id so a motion tick always visits them in launch
//! order.

use super::clay::{Clay, ClayContext, ClayId};
use crate::host::{TargetHandle, TargetHost};

#[derive(Debug, Default)]
pub struct ClayRegistry {
    clays: Vec<Clay>,
    next_id: u32,
}

impl ClayRegistry {
    pub fn new() -> Self {
        Self {
            clays: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate the id for the next launched clay
    pub fn next_clay_id(&mut self) -> ClayId {
        let id = ClayId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn insert(&mut self, clay: Clay) {
        let at = self.clays.partition_point(|c| c.id() < clay.id());
        self.clays.insert(at, clay);
    }

    pub fn len(&self) -> usize {
        self.clays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clay> {
        self.clays.iter()
    }

    pub fn contains_target(&self, target: TargetHandle) -> bool {
        self.clays.iter().any(|c| c.target() == target)
    }

    /// Advance every clay one tick and evict the ones that are no longer
    /// visible. Evicted clays are returned; their targets are still rendered.
    pub fn advance_all<H: TargetHost + ?Sized>(&mut self, ctx: &ClayContext<'_, H>) -> Vec<Clay> {
        let mut evicted = Vec::new();
        let mut kept = Vec::with_capacity(self.clays.len());
        for mut clay in self.clays.drain(..) {
            if clay.advance(ctx) {
                kept.push(clay);
            } else {
                evicted.push(clay);
            }
        }
        self.clays = kept;
        evicted
    }

    /// Take the clay drawn by `target` out of the registry
    pub fn remove_by_target(&mut self, target: TargetHandle) -> Option<Clay> {
        let index = self.clays.iter().position(|c| c.target() == target)?;
        Some(self.clays.remove(index))
    }

    /// Remove every clay
    pub fn drain(&mut self) -> Vec<Clay> {
        std::mem::take(&mut self.clays)
    }
}
