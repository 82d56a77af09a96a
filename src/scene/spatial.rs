//! Per-object payload stored in the scene graph.

use super::{Controller, ControllerError, ControllerList, Transform};
use crate::core::NodeId;
use crate::math::Bound;
use serde::{Deserialize, Serialize};

/// How the culler treats an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullingMode {
    /// Test the world bound against the culler.
    #[default]
    Dynamic,
    /// Never draw the object or its subtree.
    Always,
    /// Draw the object and its whole subtree without testing.
    Never,
}

/// Interior node or leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialKind {
    /// Grouping node with child slots. Slots may be empty.
    Node {
        /// Child slots.
        children: Vec<Option<NodeId>>,
    },
    /// Drawable leaf with a bound in model space.
    Leaf {
        /// Bound of the leaf's geometry in model space.
        model_bound: Bound,
    },
}

/// A scene object: transforms, bounds, culling and controllers.
#[derive(Debug)]
pub struct Spatial {
    name: String,
    local: Transform,
    world: Transform,
    world_bound: Bound,
    world_transform_is_current: bool,
    world_bound_is_current: bool,
    culling: CullingMode,
    pub(super) parent: Option<NodeId>,
    pub(super) kind: SpatialKind,
    pub(super) controllers: ControllerList<Spatial>,
}

impl Spatial {
    fn with_kind(name: impl Into<String>, kind: SpatialKind) -> Self {
        Self {
            name: name.into(),
            local: Transform::new(),
            world: Transform::new(),
            world_bound: Bound::default(),
            world_transform_is_current: false,
            world_bound_is_current: false,
            culling: CullingMode::Dynamic,
            parent: None,
            kind,
            controllers: ControllerList::new(),
        }
    }

    /// Create an interior node with no children.
    pub fn node(name: impl Into<String>) -> Self {
        Self::with_kind(name, SpatialKind::Node { children: Vec::new() })
    }

    /// Create a leaf with a model-space bound.
    pub fn leaf(name: impl Into<String>, model_bound: Bound) -> Self {
        Self::with_kind(name, SpatialKind::Leaf { model_bound })
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Transform relative to the parent.
    #[inline]
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Mutable local transform.
    #[inline]
    pub fn local_mut(&mut self) -> &mut Transform {
        &mut self.local
    }

    /// Replace the local transform.
    #[inline]
    pub fn set_local(&mut self, local: Transform) {
        self.local = local;
    }

    /// Model-to-world transform from the last update.
    #[inline]
    pub fn world(&self) -> &Transform {
        &self.world
    }

    /// Set the world transform directly. Updates leave it untouched until
    /// the flag is cleared.
    pub fn set_world_transform(&mut self, world: Transform) {
        self.world = world;
        self.world_transform_is_current = true;
    }

    /// Whether updates keep the current world transform.
    #[inline]
    pub fn world_transform_is_current(&self) -> bool {
        self.world_transform_is_current
    }

    /// Set whether updates keep the current world transform.
    #[inline]
    pub fn set_world_transform_is_current(&mut self, current: bool) {
        self.world_transform_is_current = current;
    }

    /// World-space bound from the last update.
    #[inline]
    pub fn world_bound(&self) -> &Bound {
        &self.world_bound
    }

    /// Set the world bound directly. Updates leave it untouched until the
    /// flag is cleared.
    pub fn set_world_bound(&mut self, bound: Bound) {
        self.world_bound = bound;
        self.world_bound_is_current = true;
    }

    /// Whether updates keep the current world bound.
    #[inline]
    pub fn world_bound_is_current(&self) -> bool {
        self.world_bound_is_current
    }

    /// Set whether updates keep the current world bound.
    #[inline]
    pub fn set_world_bound_is_current(&mut self, current: bool) {
        self.world_bound_is_current = current;
    }

    pub(super) fn store_world(&mut self, world: Transform) {
        self.world = world;
    }

    pub(super) fn store_world_bound(&mut self, bound: Bound) {
        self.world_bound = bound;
    }

    /// Get the culling mode.
    #[inline]
    pub fn culling(&self) -> CullingMode {
        self.culling
    }

    /// Set the culling mode.
    #[inline]
    pub fn set_culling(&mut self, culling: CullingMode) {
        self.culling = culling;
    }

    /// Parent handle, if attached.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Node or leaf.
    #[inline]
    pub fn kind(&self) -> &SpatialKind {
        &self.kind
    }

    /// Check if this is an interior node.
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self.kind, SpatialKind::Node { .. })
    }

    /// Child slots. Leaves have none.
    pub fn children(&self) -> &[Option<NodeId>] {
        match &self.kind {
            SpatialKind::Node { children } => children,
            SpatialKind::Leaf { .. } => &[],
        }
    }

    /// Model-space bound of a leaf.
    pub fn model_bound(&self) -> Option<&Bound> {
        match &self.kind {
            SpatialKind::Leaf { model_bound } => Some(model_bound),
            SpatialKind::Node { .. } => None,
        }
    }

    /// Replace the model-space bound of a leaf. Returns false on a node.
    pub fn set_model_bound(&mut self, bound: Bound) -> bool {
        match &mut self.kind {
            SpatialKind::Leaf { model_bound } => {
                *model_bound = bound;
                true
            }
            SpatialKind::Node { .. } => false,
        }
    }

    /// Attach a controller. Controllers run in attachment order on update.
    pub fn attach_controller(
        &mut self,
        controller: Box<dyn Controller<Spatial>>,
    ) -> Result<usize, ControllerError> {
        self.controllers.attach(controller)
    }

    /// Detach the controller at `index`.
    pub fn detach_controller(&mut self, index: usize) -> Option<Box<dyn Controller<Spatial>>> {
        self.controllers.detach(index)
    }

    /// Detach every controller.
    pub fn detach_all_controllers(&mut self) {
        self.controllers.detach_all();
    }

    /// Number of attached controllers.
    #[inline]
    pub fn num_controllers(&self) -> usize {
        self.controllers.len()
    }

    /// Run the attached controllers. Controllers attached while they run are
    /// kept after the existing ones.
    pub fn update_controllers(&mut self, application_time: f64) -> bool {
        let mut controllers = std::mem::take(&mut self.controllers);
        let changed = controllers.update(application_time, self);
        controllers.append(&mut self.controllers);
        self.controllers = controllers;
        changed
    }
}
