//! Arena-backed scene graph: hierarchy, world updates and visibility.

use super::{Culler, CullingMode, SceneError, Spatial, SpatialKind};
use crate::core::{NameGenerator, NodeId};
use crate::math::Bound;

#[derive(Debug)]
struct Slot {
    generation: u32,
    spatial: Option<Spatial>,
}

/// Owner of every spatial in a scene.
///
/// Nodes are addressed by [`NodeId`]. Each node has at most one parent and a
/// parent exclusively owns its subtree: removing a node removes all of its
/// descendants.
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    names: NameGenerator,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            names: NameGenerator::new("node"),
        }
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every node. Slots are kept with a new generation, so handles
    /// issued before the clear stay dead.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.spatial.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }

    /// Add a detached spatial. An empty name is replaced by a generated one.
    pub fn insert(&mut self, mut spatial: Spatial) -> NodeId {
        if spatial.name().is_empty() {
            spatial.set_name(self.names.next_name());
        }
        spatial.parent = None;
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.spatial = Some(spatial);
            NodeId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                spatial: Some(spatial),
            });
            NodeId::new((self.slots.len() - 1) as u32, 0)
        }
    }

    /// Add an interior node.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(Spatial::node(name))
    }

    /// Add a leaf with a model-space bound.
    pub fn create_leaf(&mut self, name: impl Into<String>, model_bound: Bound) -> NodeId {
        self.insert(Spatial::leaf(name, model_bound))
    }

    /// Check if a handle refers to a live node.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a node.
    pub fn get(&self, id: NodeId) -> Option<&Spatial> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.spatial.as_ref())
    }

    /// Get a mutable node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Spatial> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.spatial.as_mut())
    }

    fn try_get(&self, id: NodeId) -> Result<&Spatial, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Iterate over every live node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Spatial)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.spatial
                .as_ref()
                .map(|spatial| (NodeId::new(index as u32, slot.generation), spatial))
        })
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, spatial)| spatial.parent().is_none())
            .map(|(id, _)| id)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Spatial::parent)
    }

    /// Number of child slots, empty slots included. Zero for leaves and
    /// unknown nodes.
    pub fn num_children(&self, parent: NodeId) -> usize {
        self.get(parent).map_or(0, |s| s.children().len())
    }

    /// Child in slot `index`, if the slot is occupied.
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.get(parent)
            .and_then(|s| s.children().get(index).copied())
            .flatten()
    }

    fn children_mut(&mut self, parent: NodeId) -> Option<&mut Vec<Option<NodeId>>> {
        match &mut self.get_mut(parent)?.kind {
            SpatialKind::Node { children } => Some(children),
            SpatialKind::Leaf { .. } => None,
        }
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let parent_spatial = self.try_get(parent)?;
        let child_spatial = self.try_get(child)?;

        if parent == child {
            return Err(SceneError::SelfAttachment(child));
        }
        if !parent_spatial.is_node() {
            return Err(SceneError::NotANode(parent));
        }
        if let Some(current) = child_spatial.parent() {
            return Err(SceneError::ChildAlreadyParented { child, parent: current });
        }

        let mut ancestor = parent_spatial.parent();
        while let Some(id) = ancestor {
            if id == child {
                return Err(SceneError::WouldCreateCycle { parent, child });
            }
            ancestor = self.parent(id);
        }
        Ok(())
    }

    fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Some(spatial) = self.get_mut(child) {
            spatial.parent = parent;
        }
    }

    /// Attach `child` under `parent`, reusing the first empty slot. Returns
    /// the slot index.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<usize, SceneError> {
        self.check_attachable(parent, child)?;

        let children = self.children_mut(parent).ok_or(SceneError::NotANode(parent))?;
        let index = match children.iter().position(Option::is_none) {
            Some(index) => {
                children[index] = Some(child);
                index
            }
            None => {
                children.push(Some(child));
                children.len() - 1
            }
        };
        self.set_parent(child, Some(parent));

        log::debug!("Attached {child} to {parent} at slot {index}");
        Ok(index)
    }

    /// Detach `child` from `parent`. Returns the slot it occupied.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let children = self.children_mut(parent)?;
        let index = children.iter().position(|slot| *slot == Some(child))?;
        children[index] = None;
        self.set_parent(child, None);

        log::debug!("Detached {child} from {parent} slot {index}");
        Some(index)
    }

    /// Empty slot `index` of `parent`. Returns the detached child.
    pub fn detach_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.children_mut(parent)?.get_mut(index)?.take()?;
        self.set_parent(child, None);

        log::debug!("Detached {child} from {parent} slot {index}");
        Some(child)
    }

    /// Put `child` (or nothing) into existing slot `index`, detaching the
    /// previous occupant. Returns the previous occupant.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: Option<NodeId>,
    ) -> Result<Option<NodeId>, SceneError> {
        let spatial = self.try_get(parent)?;
        if !spatial.is_node() {
            return Err(SceneError::NotANode(parent));
        }
        let len = spatial.children().len();
        if index >= len {
            return Err(SceneError::SlotOutOfRange { node: parent, index, len });
        }
        if let Some(child) = child {
            self.check_attachable(parent, child)?;
        }

        let children = self.children_mut(parent).ok_or(SceneError::NotANode(parent))?;
        let previous = std::mem::replace(&mut children[index], child);
        if let Some(previous) = previous {
            self.set_parent(previous, None);
        }
        if let Some(child) = child {
            self.set_parent(child, Some(parent));
        }
        Ok(previous)
    }

    /// Remove a node and its whole subtree. Returns the number of nodes
    /// removed.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        let parent = self.try_get(id)?.parent();
        if let Some(parent) = parent {
            self.detach_child(parent, id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index()) else {
                continue;
            };
            if slot.generation != current.generation() {
                continue;
            }
            if let Some(spatial) = slot.spatial.take() {
                stack.extend(spatial.children().iter().flatten().copied());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index() as u32);
                self.len -= 1;
                removed += 1;
            }
        }

        log::debug!("Removed {removed} node(s) rooted at {id}");
        Ok(removed)
    }

    /// Find the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, spatial)| spatial.name() == name)
            .map(|(id, _)| id)
    }

    /// Visit `root` and its descendants depth first, parents before children.
    pub fn traverse<F>(&self, root: NodeId, mut callback: F)
    where
        F: FnMut(NodeId, &Spatial),
    {
        self.traverse_recursive(root, &mut callback);
    }

    fn traverse_recursive<F>(&self, id: NodeId, callback: &mut F)
    where
        F: FnMut(NodeId, &Spatial),
    {
        if let Some(spatial) = self.get(id) {
            callback(id, spatial);
            for child in spatial.children().iter().flatten() {
                self.traverse_recursive(*child, callback);
            }
        }
    }

    /// Recompute world data for the subtree at `id`: controllers, then world
    /// transforms top-down, then world bounds bottom-up. With `initiator`
    /// the new bound is also merged into every ancestor.
    ///
    /// Returns true if any controller in the subtree changed its object.
    pub fn update(&mut self, id: NodeId, application_time: f64, initiator: bool) -> Result<bool, SceneError> {
        self.try_get(id)?;
        let changed = self.update_subtree(id, application_time);
        if initiator {
            self.propagate_bound_to_root(id);
        }
        log::trace!("Updated subtree {id} at t = {application_time} (changed: {changed})");
        Ok(changed)
    }

    fn update_subtree(&mut self, id: NodeId, application_time: f64) -> bool {
        let Some(spatial) = self.get_mut(id) else {
            return false;
        };
        let mut changed = spatial.update_controllers(application_time);
        self.update_world_transform(id);

        for index in 0..self.num_children(id) {
            if let Some(child) = self.child(id, index) {
                changed |= self.update_subtree(child, application_time);
            }
        }

        self.update_world_bound(id);
        changed
    }

    fn update_world_transform(&mut self, id: NodeId) {
        let world = match self.get(id) {
            Some(spatial) if !spatial.world_transform_is_current() => {
                match spatial.parent().and_then(|p| self.get(p)) {
                    Some(parent) => parent.world().multiply(spatial.local()),
                    None => spatial.local().clone(),
                }
            }
            _ => return,
        };
        if let Some(spatial) = self.get_mut(id) {
            spatial.store_world(world);
        }
    }

    /// Recompute the world bound of `id` from its children's world bounds,
    /// or from the model bound for a leaf.
    pub fn update_world_bound(&mut self, id: NodeId) {
        let bound = match self.get(id) {
            Some(spatial) if !spatial.world_bound_is_current() => match spatial.kind() {
                SpatialKind::Node { children } => {
                    let mut bound = Bound::default();
                    for child in children.iter().flatten() {
                        if let Some(child) = self.get(*child) {
                            bound.grow_to_contain(child.world_bound());
                        }
                    }
                    bound
                }
                SpatialKind::Leaf { model_bound } => model_bound.transform_by(spatial.world()),
            },
            _ => return,
        };
        if let Some(spatial) = self.get_mut(id) {
            spatial.store_world_bound(bound);
        }
    }

    /// Recompute the world bound of every ancestor of `id`.
    pub fn propagate_bound_to_root(&mut self, id: NodeId) {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            self.update_world_bound(ancestor);
            current = self.parent(ancestor);
        }
    }

    /// Feed the potentially visible leaves under `root` to `culler`.
    pub fn get_visible_set<C>(&self, root: NodeId, culler: &mut C)
    where
        C: Culler + ?Sized,
    {
        self.collect_visible(root, culler, false);
    }

    fn collect_visible<C>(&self, id: NodeId, culler: &mut C, mut no_cull: bool)
    where
        C: Culler + ?Sized,
    {
        let Some(spatial) = self.get(id) else {
            return;
        };
        match spatial.culling() {
            CullingMode::Always => return,
            CullingMode::Never => no_cull = true,
            CullingMode::Dynamic => {}
        }

        let saved_state = culler.plane_state();
        if no_cull || culler.is_visible(spatial.world_bound()) {
            match spatial.kind() {
                SpatialKind::Leaf { .. } => culler.insert(id, spatial),
                SpatialKind::Node { children } => {
                    for child in children.iter().flatten() {
                        self.collect_visible(*child, culler, no_cull);
                    }
                }
            }
        }
        culler.set_plane_state(saved_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Matrix3, Plane, Point3, Vector3};
    use crate::scene::{Controller, PlaneCuller, Transform, VisibleSet};

    fn unit_leaf(graph: &mut SceneGraph, name: &str) -> NodeId {
        graph.create_leaf(name, Bound::new(Point3::ORIGIN, 1.0))
    }

    fn translate(graph: &mut SceneGraph, id: NodeId, x: f32, y: f32, z: f32) {
        if let Some(s) = graph.get_mut(id) {
            s.local_mut().set_translate(Vector3::new(x, y, z));
        }
    }

    struct Spin;

    impl Controller<Spatial> for Spin {
        fn update(&mut self, application_time: f64, object: &mut Spatial) -> bool {
            object
                .local_mut()
                .set_rotate(Matrix3::from_axis_angle(&Vector3::UNIT_Z, application_time as f32));
            true
        }
    }

    #[test]
    fn test_attach_sets_parent_and_reuses_slots() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let a = unit_leaf(&mut g, "a");
        let b = unit_leaf(&mut g, "b");
        let c = unit_leaf(&mut g, "c");

        assert_eq!(g.attach_child(root, a), Ok(0));
        assert_eq!(g.attach_child(root, b), Ok(1));
        assert_eq!(g.parent(a), Some(root));

        assert_eq!(g.detach_child(root, a), Some(0));
        assert_eq!(g.parent(a), None);
        assert_eq!(g.num_children(root), 2);
        assert_eq!(g.child(root, 0), None);

        // First empty slot is reused.
        assert_eq!(g.attach_child(root, c), Ok(0));
        assert_eq!(g.child(root, 0), Some(c));
    }

    #[test]
    fn test_attach_rejects_parented_child_without_mutation() {
        let mut g = SceneGraph::new();
        let p1 = g.create_node("p1");
        let p2 = g.create_node("p2");
        let child = unit_leaf(&mut g, "child");
        g.attach_child(p1, child).unwrap();

        assert_eq!(
            g.attach_child(p2, child),
            Err(SceneError::ChildAlreadyParented { child, parent: p1 })
        );
        assert_eq!(g.num_children(p2), 0);
        assert_eq!(g.parent(child), Some(p1));
        assert_eq!(g.child(p1, 0), Some(child));
    }

    #[test]
    fn test_attach_errors() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let mid = g.create_node("mid");
        let leaf = unit_leaf(&mut g, "leaf");
        let other = unit_leaf(&mut g, "other");
        g.attach_child(root, mid).unwrap();

        assert_eq!(g.attach_child(root, root), Err(SceneError::SelfAttachment(root)));
        assert_eq!(g.attach_child(leaf, other), Err(SceneError::NotANode(leaf)));
        assert_eq!(
            g.attach_child(mid, root),
            Err(SceneError::WouldCreateCycle { parent: mid, child: root })
        );

        g.remove(other).unwrap();
        assert_eq!(g.attach_child(root, other), Err(SceneError::UnknownNode(other)));
        assert_eq!(g.num_children(root), 1);
        assert_eq!(g.num_children(mid), 0);
    }

    #[test]
    fn test_detach_child_at() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let a = unit_leaf(&mut g, "a");
        g.attach_child(root, a).unwrap();

        assert_eq!(g.detach_child_at(root, 5), None);
        assert_eq!(g.detach_child_at(root, 0), Some(a));
        assert_eq!(g.detach_child_at(root, 0), None);
        assert_eq!(g.parent(a), None);
        assert_eq!(g.detach_child(root, a), None);
    }

    #[test]
    fn test_set_child() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let a = unit_leaf(&mut g, "a");
        let b = unit_leaf(&mut g, "b");

        assert_eq!(
            g.set_child(root, 0, Some(a)),
            Err(SceneError::SlotOutOfRange { node: root, index: 0, len: 0 })
        );

        g.attach_child(root, a).unwrap();
        assert_eq!(g.set_child(root, 0, Some(b)), Ok(Some(a)));
        assert_eq!(g.parent(a), None);
        assert_eq!(g.parent(b), Some(root));

        assert_eq!(g.set_child(root, 0, None), Ok(Some(b)));
        assert_eq!(g.num_children(root), 1);
        assert_eq!(g.child(root, 0), None);
    }

    #[test]
    fn test_remove_subtree() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let mid = g.create_node("mid");
        let a = unit_leaf(&mut g, "a");
        let b = unit_leaf(&mut g, "b");
        g.attach_child(root, mid).unwrap();
        g.attach_child(mid, a).unwrap();
        g.attach_child(mid, b).unwrap();

        assert_eq!(g.remove(mid), Ok(3));
        assert_eq!(g.len(), 1);
        assert!(!g.contains(a) && !g.contains(b) && !g.contains(mid));
        assert_eq!(g.child(root, 0), None);

        // Reused slots get a new generation.
        let fresh = unit_leaf(&mut g, "fresh");
        assert!(g.contains(fresh));
        assert!(!g.contains(a) && !g.contains(b) && !g.contains(mid));
        assert_eq!(g.remove(mid), Err(SceneError::UnknownNode(mid)));
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut g = SceneGraph::new();
        let a = g.create_node("a");
        let leaf = unit_leaf(&mut g, "leaf");
        g.attach_child(a, leaf).unwrap();

        g.clear();
        assert!(g.is_empty());
        assert!(!g.contains(a) && !g.contains(leaf));

        let b = g.create_node("b");
        assert_ne!(a, b);
        assert!(!g.contains(a));
        assert_eq!(g.get(a).map(Spatial::name), None);
        assert_eq!(g.get(b).map(Spatial::name), Some("b"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_generated_names_and_find() {
        let mut g = SceneGraph::new();
        let unnamed = g.create_node("");
        let named = g.create_node("camera_rig");
        assert_eq!(g.get(unnamed).map(Spatial::name), Some("node_0"));
        assert_eq!(g.find_by_name("camera_rig"), Some(named));
        assert_eq!(g.find_by_name("missing"), None);
    }

    #[test]
    fn test_world_is_parent_world_times_local() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let mid = g.create_node("mid");
        let leaf = unit_leaf(&mut g, "leaf");
        g.attach_child(root, mid).unwrap();
        g.attach_child(mid, leaf).unwrap();

        if let Some(s) = g.get_mut(root) {
            s.local_mut().set_rotate(Matrix3::from_axis_angle(&Vector3::UNIT_Y, 0.5));
            s.local_mut().set_uniform_scale(2.0);
        }
        translate(&mut g, mid, 1.0, 2.0, 3.0);
        if let Some(s) = g.get_mut(leaf) {
            s.local_mut().set_scale(Vector3::new(1.0, 2.0, 0.5));
        }

        g.update(root, 0.0, true).unwrap();

        for id in [mid, leaf] {
            let parent = g.parent(id).unwrap();
            let expected = g.get(parent).unwrap().world().to_matrix()
                .multiply(&g.get(id).unwrap().local().to_matrix());
            assert!(g.get(id).unwrap().world().to_matrix().approx_eq(&expected, 1e-5));
        }
        assert_eq!(g.get(root).unwrap().world(), g.get(root).unwrap().local());
    }

    #[test]
    fn test_current_world_transform_is_kept() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let fixed = Transform::from_translation(Vector3::new(7.0, 0.0, 0.0));
        g.get_mut(root).unwrap().set_world_transform(fixed.clone());
        translate(&mut g, root, 1.0, 0.0, 0.0);

        assert_eq!(g.update(root, 0.0, true), Ok(false));
        assert_eq!(g.get(root).unwrap().world(), &fixed);
    }

    #[test]
    fn test_node_bound_contains_children() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let offsets = [(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 3.0, 0.0)];
        let mut leaves = Vec::new();
        for (i, (x, y, z)) in offsets.into_iter().enumerate() {
            let leaf = unit_leaf(&mut g, &format!("leaf{i}"));
            translate(&mut g, leaf, x, y, z);
            g.attach_child(root, leaf).unwrap();
            leaves.push(leaf);
        }

        g.update(root, 0.0, true).unwrap();

        let bound = *g.get(root).unwrap().world_bound();
        for leaf in leaves {
            let child = g.get(leaf).unwrap().world_bound();
            assert!((child.radius - 1.0).abs() < 1e-6);
            let reach = bound.center.distance_to(&child.center) + child.radius;
            assert!(reach <= bound.radius + 1e-5, "{:?} escapes {:?}", child, bound);
        }
    }

    #[test]
    fn test_initiator_propagates_bound() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let leaf = unit_leaf(&mut g, "leaf");
        g.attach_child(root, leaf).unwrap();
        g.update(root, 0.0, true).unwrap();

        translate(&mut g, leaf, 10.0, 0.0, 0.0);
        g.update(leaf, 0.0, false).unwrap();
        assert!(g.get(root).unwrap().world_bound().center.approx_eq(&Point3::ORIGIN, 1e-6));

        g.update(leaf, 0.0, true).unwrap();
        assert!(g.get(root).unwrap().world_bound().center.approx_eq(&Point3::new(10.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_controllers_run_before_world_update() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let arm = unit_leaf(&mut g, "arm");
        g.attach_child(root, arm).unwrap();
        g.get_mut(root).unwrap().attach_controller(Box::new(Spin)).unwrap();
        translate(&mut g, arm, 1.0, 0.0, 0.0);

        let angle = std::f64::consts::FRAC_PI_2;
        assert_eq!(g.update(root, angle, true), Ok(true));
        let center = g.get(arm).unwrap().world_bound().center;
        assert!(center.approx_eq(&Point3::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_update_unknown_node() {
        let mut g = SceneGraph::new();
        let id = g.create_node("gone");
        g.remove(id).unwrap();
        assert_eq!(g.update(id, 0.0, true), Err(SceneError::UnknownNode(id)));
    }

    #[test]
    fn test_visible_set_culling_modes() {
        let mut g = SceneGraph::new();
        let root = g.create_node("root");
        let inside = unit_leaf(&mut g, "inside");
        let outside = unit_leaf(&mut g, "outside");
        let forced = unit_leaf(&mut g, "forced");
        let hidden = unit_leaf(&mut g, "hidden");
        for leaf in [inside, outside, forced, hidden] {
            g.attach_child(root, leaf).unwrap();
        }
        translate(&mut g, inside, 5.0, 0.0, 0.0);
        translate(&mut g, outside, -5.0, 0.0, 0.0);
        translate(&mut g, forced, -5.0, 0.0, 0.0);
        translate(&mut g, hidden, 5.0, 0.0, 0.0);
        g.get_mut(forced).unwrap().set_culling(CullingMode::Never);
        g.get_mut(hidden).unwrap().set_culling(CullingMode::Always);
        g.update(root, 0.0, true).unwrap();

        let mut culler = PlaneCuller::with_planes([Plane::new(Vector3::UNIT_X, 0.0)]);
        g.get_visible_set(root, &mut culler);
        let visible = culler.visible_set();
        assert_eq!(visible.as_slice(), &[inside, forced]);
        assert_eq!(culler.plane_state(), 1);

        let mut everything = VisibleSet::new();
        g.get_visible_set(root, &mut everything);
        assert_eq!(everything.len(), 3);
        assert!(!everything.contains(hidden));
    }
}
