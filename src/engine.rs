//! Rendering engine.
//!
//! The [`Engine`] owns the scene, camera, light and framebuffer and
//! dispatches a frame to one of the four render paths. It also tracks
//! when the Gouraud shading cache has gone stale: any camera, light or
//! lighting-config change marks it dirty, and the next ray-traced frame
//! rebuilds it before tracing.

use std::time::Instant;

use thiserror::Error;

use crate::camera::Camera;
use crate::colors;
use crate::lighting::{LightingConfig, ShadingCache};
use crate::math::vec3::Vec3;
use crate::projector::{Projector, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::raytrace;
use crate::render::filter::edge_aware_blur;
use crate::render::scanline::fill_triangle;
use crate::render::wireframe::{draw_point_cloud, draw_wireframe};
use crate::render::{CanvasTriangle, Framebuffer};
use crate::scene::Scene;

const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 4.0);
const DEFAULT_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 0.9, 0.0);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scene contains no triangles")]
    EmptyScene,
}

/// Which of the four render paths draws the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Scene vertices as dots (key: 1)
    PointCloud,
    /// Stroked triangle edges (key: 2)
    #[default]
    Wireframe,
    /// Scanline rasterization with depth testing (key: 3)
    Raster,
    /// Ray tracing with shadows and shading (key: 4)
    Raytrace,
}

pub struct Engine {
    scene: Scene,
    camera: Camera,
    projector: Projector,
    framebuffer: Framebuffer,
    lighting: LightingConfig,
    light_position: Vec3,
    shading_cache: ShadingCache,
    cache_dirty: bool,
    render_mode: RenderMode,
}

impl Engine {
    pub fn new(scene: Scene) -> Self {
        let shading_cache = ShadingCache::new(scene.vertices.len());
        Self {
            scene,
            camera: Camera::looking_at(DEFAULT_CAMERA_POSITION, Vec3::ZERO),
            projector: Projector::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            framebuffer: Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            lighting: LightingConfig::default(),
            light_position: DEFAULT_LIGHT_POSITION,
            shading_cache,
            cache_dirty: true,
            render_mode: RenderMode::default(),
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn translate_camera(&mut self, movement: Vec3) {
        self.camera.translate(movement);
        self.cache_dirty = true;
    }

    pub fn orbit_camera(&mut self, x_radians: f32, y_radians: f32) {
        self.camera.orbit(x_radians, y_radians);
        self.cache_dirty = true;
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    pub fn move_light(&mut self, movement: Vec3) {
        self.light_position = self.light_position + movement;
        self.cache_dirty = true;
    }

    pub fn lighting(&self) -> &LightingConfig {
        &self.lighting
    }

    /// Mutable access to the lighting config. Conservatively marks the
    /// shading cache dirty even if the caller changes nothing.
    pub fn lighting_mut(&mut self) -> &mut LightingConfig {
        self.cache_dirty = true;
        &mut self.lighting
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// The rendered frame as raw ARGB8888 bytes.
    pub fn frame_bytes(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    /// Renders one frame with the active render path.
    pub fn render(&mut self) -> Result<(), RenderError> {
        if self.scene.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let start = Instant::now();
        self.framebuffer.clear(colors::BACKGROUND);

        match self.render_mode {
            RenderMode::PointCloud => draw_point_cloud(
                &self.scene,
                &self.camera,
                &self.projector,
                &mut self.framebuffer,
            ),
            RenderMode::Wireframe => draw_wireframe(
                &self.scene,
                &self.camera,
                &self.projector,
                &mut self.framebuffer,
            ),
            RenderMode::Raster => self.rasterize(),
            RenderMode::Raytrace => self.raytrace(),
        }

        log::debug!(
            "{:?} frame rendered in {:.1?}",
            self.render_mode,
            start.elapsed()
        );
        Ok(())
    }

    fn rasterize(&mut self) {
        for index in 0..self.scene.triangles.len() {
            let projected: Option<Vec<_>> = (0..3)
                .map(|corner| {
                    self.projector
                        .project(&self.camera, self.scene.triangle_vertex(index, corner))
                })
                .collect();
            // Triangles with any vertex behind the camera are dropped whole.
            let Some(points) = projected else {
                continue;
            };

            let mut canvas_triangle = CanvasTriangle::new(
                [points[0], points[1], points[2]],
                self.scene.triangles[index].color,
            );
            if let Some(uvs) = self.scene.triangle_texture_points(index) {
                canvas_triangle = canvas_triangle.with_texture_points(uvs);
            }
            fill_triangle(
                &canvas_triangle,
                self.scene.texture.as_ref(),
                &mut self.framebuffer,
            );
        }
    }

    fn raytrace(&mut self) {
        if self.cache_dirty {
            self.shading_cache.preprocess(
                &self.scene,
                self.light_position,
                self.camera.position(),
                &self.lighting,
            );
            self.cache_dirty = false;
        }

        raytrace::render_frame(
            &self.scene,
            &self.camera,
            &self.projector,
            self.light_position,
            &self.lighting,
            &self.shading_cache,
            &mut self.framebuffer,
        );

        if self.lighting.filter {
            let blurred = edge_aware_blur(
                self.framebuffer.color_buffer(),
                self.framebuffer.width(),
                self.framebuffer.height(),
            );
            self.framebuffer.overwrite_colors(&blurred);
        }
    }
}
