//! Serializable scene descriptions and their two-phase load.
//!
//! A description lists nodes flat. Child references are [`LinkKey`]s that
//! name another entry by position or by name, so a description can be
//! written by hand or produced by [`SceneGraph::describe`]. Loading first
//! creates every node and then resolves the links.

use super::{CullingMode, KeyframeController, SceneError, SceneGraph, Spatial, SpatialKind, Transform};
use crate::core::NodeId;
use crate::math::Bound;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reference from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkKey {
    /// Position in [`SceneDescription::nodes`].
    Index(usize),
    /// Name of a described node.
    Name(String),
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKey::Index(index) => write!(f, "#{index}"),
            LinkKey::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Node or leaf payload of a described node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum NodeKindDescription {
    /// Interior node.
    #[default]
    Node,
    /// Leaf with a model-space bound.
    Leaf {
        /// Bound of the leaf's geometry in model space.
        model_bound: Bound,
    },
}

/// One node of a [`SceneDescription`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Node name. Empty names are generated on load and cannot be linked to.
    #[serde(default)]
    pub name: String,
    /// Transform relative to the parent.
    #[serde(default)]
    pub local: Transform,
    /// Node or leaf.
    #[serde(default)]
    pub kind: NodeKindDescription,
    /// Child slots in order. `None` keeps an empty slot.
    #[serde(default)]
    pub children: Vec<Option<LinkKey>>,
    /// Culling mode.
    #[serde(default)]
    pub culling: CullingMode,
    /// Keyframe animation attached on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<KeyframeController>,
}

impl NodeDescription {
    /// Describe an interior node.
    pub fn node(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Describe a leaf.
    pub fn leaf(name: impl Into<String>, model_bound: Bound) -> Self {
        Self {
            name: name.into(),
            kind: NodeKindDescription::Leaf { model_bound },
            ..Self::default()
        }
    }

    /// Set the local transform.
    pub fn with_local(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    /// Append a child slot.
    pub fn with_child(mut self, child: Option<LinkKey>) -> Self {
        self.children.push(child);
        self
    }

    fn instantiate(&self) -> Result<Spatial, SceneError> {
        let mut spatial = match self.kind {
            NodeKindDescription::Node => Spatial::node(self.name.as_str()),
            NodeKindDescription::Leaf { model_bound } => Spatial::leaf(self.name.as_str(), model_bound),
        };
        spatial.set_local(self.local.clone());
        spatial.set_culling(self.culling);
        if let Some(keyframes) = &self.keyframes {
            if keyframes.has_scale_keys() && !self.local.is_rs_matrix() {
                return Err(SceneError::ScaleKeysOnGeneralTransform(self.name.clone()));
            }
            spatial.attach_controller(Box::new(keyframes.clone()))?;
        }
        Ok(spatial)
    }
}

/// Flat list of nodes with child links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Described nodes. Loaded handles come back in this order.
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// Resolve every child link to a node position.
    fn resolve_links(&self) -> Result<Vec<Vec<Option<usize>>>, SceneError> {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.name.is_empty() {
                continue;
            }
            if by_name.insert(node.name.as_str(), index).is_some() {
                return Err(SceneError::DuplicateName(node.name.clone()));
            }
        }

        let resolve = |link: &LinkKey| match link {
            LinkKey::Index(index) => (*index < self.nodes.len()).then_some(*index),
            LinkKey::Name(name) => by_name.get(name.as_str()).copied(),
        };

        self.nodes
            .iter()
            .map(|node| {
                node.children
                    .iter()
                    .map(|child| match child {
                        None => Ok(None),
                        Some(link) => resolve(link).map(Some).ok_or_else(|| SceneError::UnresolvedLink {
                            node: node.name.clone(),
                            link: link.to_string(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

impl SceneGraph {
    /// Add the nodes of a description and link them. Returns one handle per
    /// described node, in description order.
    ///
    /// Names and links are checked before anything is created. Structural
    /// errors while linking (a leaf with children, a child linked twice, a
    /// cycle) remove the partly loaded nodes again, so a failed load leaves
    /// the graph as it was.
    pub fn load(&mut self, description: &SceneDescription) -> Result<Vec<NodeId>, SceneError> {
        let links = description.resolve_links()?;
        let spatials = description
            .nodes
            .iter()
            .map(NodeDescription::instantiate)
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<NodeId> = spatials.into_iter().map(|spatial| self.insert(spatial)).collect();

        if let Err(err) = self.link(&ids, &links) {
            log::warn!("Scene description failed to link: {err}");
            for id in &ids {
                // Nodes already removed with an ancestor report UnknownNode.
                let _ = self.remove(*id);
            }
            return Err(err);
        }

        log::debug!("Loaded {} node(s) from scene description", ids.len());
        Ok(ids)
    }

    fn link(&mut self, ids: &[NodeId], links: &[Vec<Option<usize>>]) -> Result<(), SceneError> {
        for (parent, slots) in ids.iter().zip(links) {
            if slots.is_empty() {
                continue;
            }
            let spatial = self.get_mut(*parent).ok_or(SceneError::UnknownNode(*parent))?;
            match &mut spatial.kind {
                SpatialKind::Node { children } => children.resize(slots.len(), None),
                SpatialKind::Leaf { .. } => return Err(SceneError::NotANode(*parent)),
            }
            for (index, child) in slots.iter().enumerate() {
                if let Some(child) = child {
                    self.set_child(*parent, index, Some(ids[*child]))?;
                }
            }
        }
        Ok(())
    }

    /// Describe the subtree at `root`. Children link by index and `root` is
    /// the first entry. Controllers are not captured.
    pub fn describe(&self, root: NodeId) -> Result<SceneDescription, SceneError> {
        if !self.contains(root) {
            return Err(SceneError::UnknownNode(root));
        }

        let mut order = Vec::new();
        self.traverse(root, |id, _| order.push(id));
        let positions: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let nodes = order
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|spatial| NodeDescription {
                name: spatial.name().to_string(),
                local: spatial.local().clone(),
                kind: match spatial.kind() {
                    SpatialKind::Node { .. } => NodeKindDescription::Node,
                    SpatialKind::Leaf { model_bound } => NodeKindDescription::Leaf {
                        model_bound: *model_bound,
                    },
                },
                children: spatial
                    .children()
                    .iter()
                    .map(|slot| slot.and_then(|child| positions.get(&child)).map(|i| LinkKey::Index(*i)))
                    .collect(),
                culling: spatial.culling(),
                keyframes: None,
            })
            .collect();

        Ok(SceneDescription { nodes })
    }
}
