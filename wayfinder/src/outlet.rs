//! Outlet registry for mounted resources.
//!
//! An [`OutletMap`] tracks which resource is mounted at each named outlet of
//! one level, and every [`Mount`] owns a nested map for its own children. The
//! registry hierarchy runs parallel to the accepted route tree and is kept
//! structurally congruent with it by the reconciler: an entry exists from
//! successful mount until successful unmount, never longer.

use std::sync::Arc;

use crate::resource::Resource;
use crate::segment::Segment;

/// One mounted resource, bound to the segment it was activated for.
///
/// The owning [`OutletMap`] has exclusive ownership of the entry; removing
/// the mount from its map and dropping it is the teardown.
pub struct Mount {
    segment: Segment,
    resource: Arc<dyn Resource>,
    outlets: OutletMap,
}

impl Mount {
    pub(crate) fn new(segment: Segment, resource: Arc<dyn Resource>) -> Self {
        Self {
            segment,
            resource,
            outlets: OutletMap::new(),
        }
    }

    /// The segment this resource was mounted for.
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// The mounted resource handle.
    pub fn resource(&self) -> &Arc<dyn Resource> {
        &self.resource
    }

    /// The nested registry for this resource's children.
    pub fn outlets(&self) -> &OutletMap {
        &self.outlets
    }

    pub(crate) fn outlets_mut(&mut self) -> &mut OutletMap {
        &mut self.outlets
    }
}

/// Mapping from outlet name to the resource currently mounted there.
///
/// Keys are unique. Iteration order is insertion order, which the reconciler
/// makes equal to declared child order; the deterministic unmount and mount
/// ordering guarantees depend on this, so the map is backed by a small vec
/// rather than a hash map.
#[derive(Default)]
pub struct OutletMap {
    slots: Vec<(String, Mount)>,
}

impl OutletMap {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// The mount at `outlet`, if any.
    pub fn get(&self, outlet: &str) -> Option<&Mount> {
        self.slots
            .iter()
            .find(|(name, _)| name == outlet)
            .map(|(_, mount)| mount)
    }

    pub(crate) fn get_mut(&mut self, outlet: &str) -> Option<&mut Mount> {
        self.slots
            .iter_mut()
            .find(|(name, _)| name == outlet)
            .map(|(_, mount)| mount)
    }

    /// Register `mount` at `outlet`, returning the previous occupant if any.
    pub(crate) fn insert(&mut self, outlet: impl Into<String>, mount: Mount) -> Option<Mount> {
        let outlet = outlet.into();
        let previous = self.remove(&outlet);
        self.slots.push((outlet, mount));
        previous
    }

    /// Remove and return the mount at `outlet`.
    pub(crate) fn remove(&mut self, outlet: &str) -> Option<Mount> {
        let index = self.slots.iter().position(|(name, _)| name == outlet)?;
        Some(self.slots.remove(index).1)
    }

    /// Remove all mounts, in insertion order.
    pub(crate) fn drain(&mut self) -> Vec<(String, Mount)> {
        std::mem::take(&mut self.slots)
    }

    /// Number of mounted resources at this level.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is mounted at this level.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(outlet, mount)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mount)> {
        self.slots.iter().map(|(name, mount)| (name.as_str(), mount))
    }
}
