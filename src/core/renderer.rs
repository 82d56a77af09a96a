//! Interface to the drawing backend.

use super::NodeId;
use crate::math::Matrix4;

/// Per-frame statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderInfo {
    /// Frame number, starting at 1 for the first frame.
    pub frame: u64,
    /// Application time the frame was updated to.
    pub application_time: f64,
    /// Leaves that survived culling.
    pub visible: u32,
    /// Draw calls issued.
    pub draw_calls: u32,
}

impl RenderInfo {
    /// Reset the per-frame counters.
    pub fn reset(&mut self) {
        self.visible = 0;
        self.draw_calls = 0;
    }
}

/// One visible leaf handed to the backend with the matrices it binds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// The leaf being drawn.
    pub node: NodeId,
    /// Model-to-world matrix.
    pub world: Matrix4,
    /// World-to-model matrix.
    pub inverse_world: Matrix4,
}

impl DrawItem {
    /// World and inverse world matrices as one uniform block of 32 floats.
    pub fn uniform_bytes(&self) -> [u8; 128] {
        bytemuck::cast([self.world, self.inverse_world])
    }
}

/// Drawing backend. Resource binding and command submission live on the
/// other side of this trait.
pub trait Renderer {
    /// Called before the first draw of a frame.
    fn begin_frame(&mut self, _frame: u64) {}

    /// Draw one leaf.
    fn draw(&mut self, item: &DrawItem);

    /// Called after the last draw of a frame.
    fn end_frame(&mut self, _info: &RenderInfo) {}
}
