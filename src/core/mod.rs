//! # Core Module
//!
//! Node handles, the frame clock, the renderer interface and the engine
//! that ties them to a scene.

mod clock;
mod engine;
mod id;
mod renderer;

pub use clock::Clock;
pub use engine::{Engine, EngineConfig};
pub use id::{NameGenerator, NodeId};
pub use renderer::{DrawItem, RenderInfo, Renderer};
