//! A CPU-based Cornell-box renderer.
//!
//! This crate renders triangle-mesh scenes entirely on the CPU through
//! four interchangeable paths: a point cloud, a wireframe, a scanline
//! rasterizer with a depth buffer, and a ray tracer with shadows,
//! reflections and per-vertex or per-pixel shading. SDL2 is used only for
//! window management and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use raybox::prelude::*;
//!
//! let scene = loader::load_scene("cornell-box.obj", 0.35)?;
//! let mut engine = Engine::new(scene);
//! engine.set_render_mode(RenderMode::Raytrace);
//! engine.render()?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod lighting;
pub mod loader;
pub mod math;
pub mod projector;
pub mod raytrace;
pub mod render;
pub mod scene;
pub mod texture;

// Re-export commonly needed types at crate root for convenience
pub use engine::{Engine, RenderError, RenderMode};
pub use loader::LoadError;
pub use scene::Scene;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use raybox::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{Engine, RenderError, RenderMode};

    // Scene
    pub use crate::loader::{self, LoadError};
    pub use crate::scene::{Scene, Triangle, Vertex};

    // Camera & projection
    pub use crate::camera::Camera;
    pub use crate::projector::{Projector, CANVAS_HEIGHT, CANVAS_WIDTH};

    // Lighting
    pub use crate::lighting::LightingConfig;

    // Math
    pub use crate::math::mat3::Mat3;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Colours
    pub use crate::colors::Color;
}
