//! Point-cloud and wireframe render paths.
//!
//! Both project every vertex through the shared projector and draw
//! directly into the colour buffer without depth testing. Off-canvas
//! pixels are skipped one by one, so partially visible geometry just
//! clips.

use crate::camera::Camera;
use crate::colors;
use crate::projector::{CanvasPoint, Projector};
use crate::render::Framebuffer;
use crate::scene::Scene;

/// Draws every scene vertex as a single dot.
pub fn draw_point_cloud(scene: &Scene, camera: &Camera, projector: &Projector, fb: &mut Framebuffer) {
    for vertex in &scene.vertices {
        if let Some(point) = projector.project(camera, vertex.position) {
            fb.set_pixel(point.x as i32, point.y as i32, colors::WIREFRAME);
        }
    }
}

/// Draws every triangle as three stroked edges.
pub fn draw_wireframe(scene: &Scene, camera: &Camera, projector: &Projector, fb: &mut Framebuffer) {
    for index in 0..scene.triangles.len() {
        let projected: Option<Vec<CanvasPoint>> = (0..3)
            .map(|corner| projector.project(camera, scene.triangle_vertex(index, corner)))
            .collect();
        // Triangles with any vertex behind the camera are dropped whole.
        let Some(points) = projected else {
            continue;
        };
        draw_line(fb, points[0], points[1], colors::WIREFRAME);
        draw_line(fb, points[1], points[2], colors::WIREFRAME);
        draw_line(fb, points[0], points[2], colors::WIREFRAME);
    }
}

/// Steps from `start` to `end` one pixel at a time along the longer axis.
pub fn draw_line(fb: &mut Framebuffer, start: CanvasPoint, end: CanvasPoint, color: u32) {
    let x_diff = end.x - start.x;
    let y_diff = end.y - start.y;
    let steps = x_diff.abs().max(y_diff.abs()).ceil() as i32;
    if steps == 0 {
        fb.set_pixel(start.x as i32, start.y as i32, color);
        return;
    }
    let x_step = x_diff / steps as f32;
    let y_step = y_diff / steps as f32;
    for i in 0..=steps {
        let x = (start.x + x_step * i as f32).round() as i32;
        let y = (start.y + y_step * i as f32).round() as i32;
        fb.set_pixel(x, y, color);
    }
}
