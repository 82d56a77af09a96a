//! # Scene Module
//!
//! Scene graph with hierarchical transforms, bounding spheres, culling and
//! controllers. Nodes live in a [`SceneGraph`] arena and refer to each other
//! through [`NodeId`](crate::core::NodeId) handles.

mod controller;
mod culling;
mod description;
mod graph;
mod keyframe;
mod spatial;
mod transform;

pub use controller::{Controller, ControllerList, ControllerTiming, RepeatType};
pub use culling::{Culler, PlaneCuller, VisibleSet, MAX_PLANES};
pub use description::{LinkKey, NodeDescription, NodeKindDescription, SceneDescription};
pub use graph::SceneGraph;
pub use keyframe::KeyframeController;
pub use spatial::{CullingMode, Spatial, SpatialKind};
pub use transform::{Transform, TransformForm};

use crate::core::NodeId;
use thiserror::Error;

/// Errors from structural scene graph operations. A failed operation leaves
/// the graph unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// Children can only be attached to interior nodes.
    #[error("Node {0} is a leaf and cannot hold children")]
    NotANode(NodeId),

    /// The child already has a parent.
    #[error("Node {child} is already attached to {parent}")]
    ChildAlreadyParented {
        /// Child being attached.
        child: NodeId,
        /// Its current parent.
        parent: NodeId,
    },

    /// A node cannot be its own child.
    #[error("Node {0} cannot be attached to itself")]
    SelfAttachment(NodeId),

    /// The child is an ancestor of the parent.
    #[error("Attaching {child} under {parent} would create a cycle")]
    WouldCreateCycle {
        /// Intended parent.
        parent: NodeId,
        /// Intended child, an ancestor of `parent`.
        child: NodeId,
    },

    /// Child slot index past the end of the slot list.
    #[error("Child slot {index} out of range for node {node} with {len} slots")]
    SlotOutOfRange {
        /// Parent node.
        node: NodeId,
        /// Requested slot.
        index: usize,
        /// Number of slots.
        len: usize,
    },

    /// A child reference in a scene description names no node.
    #[error("Node '{node}' links to unknown child {link}")]
    UnresolvedLink {
        /// Name of the node holding the reference.
        node: String,
        /// The unresolved reference.
        link: String,
    },

    /// Two described nodes share a name, so links by name are ambiguous.
    #[error("Duplicate node name '{0}' in scene description")]
    DuplicateName(String),

    /// Scale keys need a rotation-scale local transform.
    #[error("Node '{0}' has scale keys but a general local transform")]
    ScaleKeysOnGeneralTransform(String),

    /// A described controller could not be attached.
    #[error("Failed to attach controller: {0}")]
    Controller(#[from] ControllerError),
}

/// Errors from controller attachment.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// Controllers driven by other controllers cannot be attached.
    #[error("Controller is itself controlled and cannot be attached")]
    ControlledController,

    /// Key times and key values differ in length.
    #[error("Keyframe channel has {times} times but {values} values")]
    KeyCountMismatch {
        /// Number of key times.
        times: usize,
        /// Number of key values.
        values: usize,
    },

    /// Key times must be strictly increasing.
    #[error("Keyframe times are not strictly increasing")]
    UnsortedKeyTimes,
}
