//! Visibility culling against world bounds.

use super::Spatial;
use crate::core::NodeId;
use crate::math::{Bound, Plane};

/// Maximum number of planes a [`PlaneCuller`] tracks.
pub const MAX_PLANES: usize = 32;

/// Decides which objects are potentially visible and collects them.
///
/// The plane state is a bit mask of planes still worth testing. The graph
/// saves it before visiting a subtree and restores it afterwards, so planes
/// a parent's bound lies fully inside are skipped for its descendants.
pub trait Culler {
    /// Whether `bound` may be visible.
    fn is_visible(&mut self, bound: &Bound) -> bool;

    /// Record a visible leaf.
    fn insert(&mut self, id: NodeId, spatial: &Spatial);

    /// Active-plane mask.
    fn plane_state(&self) -> u32 {
        0
    }

    /// Restore an active-plane mask.
    fn set_plane_state(&mut self, _state: u32) {}
}

/// Ordered set of potentially visible leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    items: Vec<NodeId>,
}

impl VisibleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf.
    #[inline]
    pub fn insert(&mut self, id: NodeId) {
        self.items.push(id);
    }

    /// Remove every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if a leaf was collected.
    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    /// Entries in traversal order.
    #[inline]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.items
    }

    /// Iterate in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }
}

/// A visible set used directly as a culler accepts everything.
impl Culler for VisibleSet {
    fn is_visible(&mut self, _bound: &Bound) -> bool {
        true
    }

    fn insert(&mut self, id: NodeId, _spatial: &Spatial) {
        VisibleSet::insert(self, id);
    }
}

/// Culler over caller-supplied planes. An object is culled when its bound
/// lies entirely on the negative side of any active plane.
#[derive(Debug, Clone)]
pub struct PlaneCuller {
    planes: Vec<Plane>,
    plane_state: u32,
    visible: VisibleSet,
}

impl Default for PlaneCuller {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneCuller {
    /// Create a culler with no planes; everything is visible.
    pub fn new() -> Self {
        Self {
            planes: Vec::new(),
            plane_state: 0,
            visible: VisibleSet::new(),
        }
    }

    /// Create a culler from planes whose normals point into the visible
    /// region. Planes past [`MAX_PLANES`] are dropped.
    pub fn with_planes(planes: impl IntoIterator<Item = Plane>) -> Self {
        let mut culler = Self::new();
        for plane in planes {
            if !culler.push_plane(plane) {
                break;
            }
        }
        culler
    }

    /// Add a plane. Returns false when the culler is full.
    pub fn push_plane(&mut self, plane: Plane) -> bool {
        if self.planes.len() >= MAX_PLANES {
            log::warn!("PlaneCuller: plane limit of {MAX_PLANES} reached, ignoring plane");
            return false;
        }
        self.planes.push(plane);
        self.plane_state |= 1 << (self.planes.len() - 1);
        true
    }

    /// Remove every plane.
    pub fn clear_planes(&mut self) {
        self.planes.clear();
        self.plane_state = 0;
    }

    /// Culling planes.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Start a new pass: empty the visible set and activate every plane.
    pub fn reset(&mut self) {
        self.visible.clear();
        self.plane_state = if self.planes.len() == MAX_PLANES {
            u32::MAX
        } else {
            (1u32 << self.planes.len()) - 1
        };
    }

    /// Leaves collected since the last reset.
    #[inline]
    pub fn visible_set(&self) -> &VisibleSet {
        &self.visible
    }
}

impl Culler for PlaneCuller {
    fn is_visible(&mut self, bound: &Bound) -> bool {
        for (i, plane) in self.planes.iter().enumerate() {
            let mask = 1u32 << i;
            if self.plane_state & mask == 0 {
                continue;
            }
            match bound.which_side(plane) {
                side if side < 0 => return false,
                // Fully inside: descendants need not test this plane.
                side if side > 0 => self.plane_state &= !mask,
                _ => {}
            }
        }
        true
    }

    fn insert(&mut self, id: NodeId, _spatial: &Spatial) {
        self.visible.insert(id);
    }

    fn plane_state(&self) -> u32 {
        self.plane_state
    }

    fn set_plane_state(&mut self, state: u32) {
        self.plane_state = state;
    }
}
