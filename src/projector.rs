//! Canvas projection.
//!
//! Maps world points to canvas coordinates (used by the rasterizer and
//! wireframe paths) and canvas pixels back to world-space rays (used by
//! the ray tracer). Both directions share the same focal length and
//! pixel scale, so projecting an unprojected pixel lands back on the
//! same pixel.

use crate::camera::Camera;
use crate::math::vec3::Vec3;
use crate::raytrace::Ray;

pub const CANVAS_WIDTH: u32 = 320;
pub const CANVAS_HEIGHT: u32 = 240;

const FOCAL_LENGTH: f32 = 2.0;
const PIXEL_SCALE: f32 = 180.0;

/// A projected point on the canvas, with its camera-space depth kept for
/// depth testing (positive, larger = farther).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// World/canvas conversion for a fixed canvas size.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    width: f32,
    height: f32,
    focal_length: f32,
    pixel_scale: f32,
}

impl Projector {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            focal_length: FOCAL_LENGTH,
            pixel_scale: PIXEL_SCALE,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Projects a world point onto the canvas. Returns `None` for points
    /// at or behind the camera plane. The horizontal axis is mirrored to
    /// match the viewer's left/right convention.
    pub fn project(&self, camera: &Camera, world: Vec3) -> Option<CanvasPoint> {
        let point = camera.to_camera(world);
        if point.z <= f32::EPSILON {
            return None;
        }
        let u = self.focal_length * (point.x / point.z) * self.pixel_scale + self.width / 2.0;
        let v = self.focal_length * (point.y / point.z) * self.pixel_scale + self.height / 2.0;
        Some(CanvasPoint {
            x: self.width - u,
            y: v,
            depth: point.z,
        })
    }

    /// Recovers the world point on the focal plane behind a canvas pixel.
    pub fn unproject(&self, camera: &Camera, x: f32, y: f32) -> Vec3 {
        self.unproject_at_depth(camera, x, y, self.focal_length)
    }

    /// Recovers the world point at a given camera-space depth behind a
    /// canvas pixel. Exact inverse of [`Projector::project`].
    pub fn unproject_at_depth(&self, camera: &Camera, x: f32, y: f32, depth: f32) -> Vec3 {
        let mirrored = self.width - x;
        let scale = self.focal_length * self.pixel_scale;
        let point = Vec3::new(
            (mirrored - self.width / 2.0) * depth / scale,
            (y - self.height / 2.0) * depth / scale,
            depth,
        );
        camera.from_camera(point)
    }

    /// Builds the primary ray through a canvas pixel, originating at the
    /// camera position.
    pub fn pixel_ray(&self, camera: &Camera, x: f32, y: f32) -> Ray {
        let plane_point = self.unproject(camera, x, y);
        Ray::new(
            camera.position(),
            (plane_point - camera.position()).normalize(),
        )
    }
}
