//! # Spatia - Scene Graph Core for Browser 3D
//!
//! Spatia is the CPU side of a real-time 3D engine: the math, transforms and
//! scene graph that decide what gets drawn and with which matrices. GPU
//! resource binding and draw submission sit behind the [`core::Renderer`]
//! trait.
//!
//! ## Features
//!
//! - **Math**: Vectors, points, planes, 3x3/4x4 matrices, quaternions, bounding spheres
//! - **Scene**: Arena scene graph with hierarchical transforms, bounds and plane culling
//! - **Controllers**: Time-driven controllers, keyframe animation
//! - **Core**: Frame clock and an engine loop feeding a renderer
//!
//! ## Example
//!
//! ```
//! use spatia::prelude::*;
//!
//! struct Count(usize);
//!
//! impl Renderer for Count {
//!     fn draw(&mut self, _item: &DrawItem) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut engine = Engine::new();
//! let root = engine.scene.create_node("root");
//! let mesh = engine.scene.create_leaf("mesh", Bound::new(Point3::ORIGIN, 1.0));
//! engine.scene.attach_child(root, mesh).unwrap();
//!
//! let mut renderer = Count(0);
//! engine.render_frame_at(0.0, &mut renderer).unwrap();
//! assert_eq!(renderer.0, 1);
//! ```

#![warn(missing_docs)]

#[cfg(feature = "web")]
use wasm_bindgen::prelude::*;

pub mod core;
pub mod logging;
pub mod math;
pub mod scene;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::core::*;
    pub use crate::logging::*;
    pub use crate::math::*;
    pub use crate::scene::*;
}

/// Initialize the crate for WASM environments.
/// Sets up panic hooks for better error messages in the browser console.
#[cfg(feature = "web")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init_logging(&logging::LoggingConfig::default());
}

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "Spatia";
