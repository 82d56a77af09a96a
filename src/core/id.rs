//! Generational handles for arena-stored scene objects.

use serde::{Deserialize, Serialize};

/// Handle to a spatial stored in a [`SceneGraph`](crate::scene::SceneGraph).
///
/// The slot index is paired with the slot's generation at allocation time, so
/// a handle to a removed node never resolves to the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the arena.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Generator for default node names with a specific prefix.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    prefix: String,
    counter: u64,
}

impl NameGenerator {
    /// Create a new name generator with a prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Generate the next name.
    pub fn next_name(&mut self) -> String {
        let n = self.counter;
        self.counter += 1;
        format!("{}_{}", self.prefix, n)
    }
}
