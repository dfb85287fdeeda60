//! Scanline triangle rasterization.
//!
//! Each triangle goes through sort -> split -> scan-top -> scan-bottom:
//! vertices are sorted by canvas y, the long edge is split at the middle
//! vertex's scanline to produce flat-bottom and flat-top halves, and each
//! half is filled by linearly interpolating its left/right x bounds per
//! scanline. Depth is blended barycentrically in reciprocal form, which
//! is perspective-correct, and texture UVs get the same treatment.
//!
//! Degenerate input (zero-area triangles, spans thinner than two pixels)
//! is skipped rather than reported; off-canvas pixels are clipped one by
//! one.

use crate::math::vec2::Vec2;
use crate::projector::CanvasPoint;
use crate::render::{CanvasTriangle, Framebuffer};
use crate::texture::Texture;

/// Minimum pixel span worth scanning; thinner spans risk dividing by a
/// near-zero width.
const MIN_SPAN: i32 = 2;

/// Barycentric weights of `(x, y)` against a triangle's three canvas
/// points, ordered to match the points. Returns `None` for zero-area
/// triangles.
pub fn barycentric(points: &[CanvasPoint; 3], x: f32, y: f32) -> Option<[f32; 3]> {
    let [a, b, c] = points;
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denominator.abs() < f32::EPSILON {
        return None;
    }
    let w0 = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / denominator;
    let w1 = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / denominator;
    Some([w0, w1, 1.0 - w0 - w1])
}

/// Fills one projected triangle into the framebuffer with depth testing,
/// sampling `texture` when the triangle carries UVs.
pub fn fill_triangle(triangle: &CanvasTriangle, texture: Option<&Texture>, fb: &mut Framebuffer) {
    let mut points = triangle.points;
    let mut uvs = triangle.texture_points.unwrap_or([Vec2::ZERO; 3]);
    sort_by_y(&mut points, &mut uvs);

    let height = points[2].y - points[0].y;
    if height.abs() < f32::EPSILON {
        return;
    }

    // Split the long edge at the middle vertex's scanline.
    let split_x = points[0].x + (points[1].y - points[0].y) / height * (points[2].x - points[0].x);
    let (left_x, right_x) = if split_x < points[1].x {
        (split_x, points[1].x)
    } else {
        (points[1].x, split_x)
    };

    let textured = triangle.texture_points.map(|_| PerspectiveUvs::new(&points, &uvs));
    let filler = Filler {
        sorted: points,
        color: triangle.color.as_argb(),
        texture,
        uvs: textured,
    };

    // Flat-bottom (top) half: v0 down to the middle scanline.
    filler.scan_half(
        fb,
        points[0].y,
        points[1].y,
        (points[0].x, left_x),
        (points[0].x, right_x),
    );
    // Flat-top (bottom) half: middle scanline down to v2.
    filler.scan_half(
        fb,
        points[1].y,
        points[2].y,
        (left_x, points[2].x),
        (right_x, points[2].x),
    );
}

/// Stable three-element sort by ascending y, permuting UVs in lockstep.
fn sort_by_y(points: &mut [CanvasPoint; 3], uvs: &mut [Vec2; 3]) {
    if points[1].y < points[0].y {
        points.swap(0, 1);
        uvs.swap(0, 1);
    }
    if points[2].y < points[1].y {
        points.swap(1, 2);
        uvs.swap(1, 2);
    }
    if points[1].y < points[0].y {
        points.swap(0, 1);
        uvs.swap(0, 1);
    }
}

/// Texture coordinates pre-divided by each vertex's depth, ready for
/// perspective-correct blending.
struct PerspectiveUvs {
    over_depth: [Vec2; 3],
}

impl PerspectiveUvs {
    fn new(points: &[CanvasPoint; 3], uvs: &[Vec2; 3]) -> Self {
        Self {
            over_depth: [
                uvs[0] / points[0].depth,
                uvs[1] / points[1].depth,
                uvs[2] / points[2].depth,
            ],
        }
    }

    /// Blends UVs with the given weights and re-divides by the blended
    /// reciprocal depth.
    fn interpolate(&self, weights: [f32; 3], inv_depth: f32) -> Vec2 {
        let blended = self.over_depth[0] * weights[0]
            + self.over_depth[1] * weights[1]
            + self.over_depth[2] * weights[2];
        blended / inv_depth
    }
}

struct Filler<'a> {
    sorted: [CanvasPoint; 3],
    color: u32,
    texture: Option<&'a Texture>,
    uvs: Option<PerspectiveUvs>,
}

impl Filler<'_> {
    /// Scans one flat-edged half. `left` and `right` give the x bounds at
    /// `y_top` and `y_bottom`; each scanline interpolates between them.
    fn scan_half(
        &self,
        fb: &mut Framebuffer,
        y_top: f32,
        y_bottom: f32,
        left: (f32, f32),
        right: (f32, f32),
    ) {
        let span = y_bottom - y_top;
        if span < f32::EPSILON {
            return;
        }

        let y_start = y_top.floor() as i32;
        let y_end = y_bottom.floor() as i32;
        for y in y_start..y_end {
            if y < 0 || y >= fb.height() as i32 {
                continue;
            }
            let t = (y as f32 - y_top) / span;
            let x_left = left.0 + t * (left.1 - left.0);
            let x_right = right.0 + t * (right.1 - right.0);

            let x_start = x_left.floor() as i32;
            let x_end = x_right.ceil() as i32;
            if (x_end - x_start).abs() < MIN_SPAN {
                continue;
            }
            for x in x_start..x_end {
                if x < 0 || x >= fb.width() as i32 {
                    continue;
                }
                self.shade_pixel(fb, x, y);
            }
        }
    }

    fn shade_pixel(&self, fb: &mut Framebuffer, x: i32, y: i32) {
        let Some(weights) = barycentric(&self.sorted, x as f32, y as f32) else {
            return;
        };

        // Perspective-correct depth: blend each vertex's reciprocal depth.
        let inv_depth = weights[0] / self.sorted[0].depth
            + weights[1] / self.sorted[1].depth
            + weights[2] / self.sorted[2].depth;

        let color = match (&self.uvs, self.texture) {
            (Some(uvs), Some(texture)) => {
                let uv = uvs.interpolate(weights, inv_depth);
                texture.sample(uv.x, uv.y)
            }
            _ => self.color,
        };
        fb.set_pixel_with_depth(x, y, inv_depth, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{Color, BACKGROUND};
    use approx::assert_relative_eq;

    fn point(x: f32, y: f32, depth: f32) -> CanvasPoint {
        CanvasPoint { x, y, depth }
    }

    fn big_triangle(depth: f32) -> CanvasTriangle {
        CanvasTriangle::new(
            [
                point(20.0, 20.0, depth),
                point(100.0, 20.0, depth),
                point(60.0, 100.0, depth),
            ],
            Color::new(200, 50, 50),
        )
    }

    #[test]
    fn barycentric_weights_sum_to_one_inside() {
        let points = [
            point(0.0, 0.0, 1.0),
            point(10.0, 0.0, 1.0),
            point(0.0, 10.0, 1.0),
        ];
        for (x, y) in [(1.0, 1.0), (3.0, 3.0), (5.0, 0.0), (0.0, 0.0)] {
            let weights = barycentric(&points, x, y).unwrap();
            assert_relative_eq!(weights.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
            assert!(weights.iter().all(|&w| w >= -1e-5));
        }
    }

    #[test]
    fn barycentric_weights_at_vertices_are_unit() {
        let points = [
            point(2.0, 1.0, 1.0),
            point(9.0, 2.0, 1.0),
            point(4.0, 8.0, 1.0),
        ];
        let expected = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for (corner, want) in points.iter().zip(expected) {
            let weights = barycentric(&points, corner.x, corner.y).unwrap();
            for (got, want) in weights.iter().zip(want) {
                assert_relative_eq!(*got, want, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn degenerate_triangle_has_no_barycentric() {
        let points = [
            point(0.0, 0.0, 1.0),
            point(5.0, 5.0, 1.0),
            point(10.0, 10.0, 1.0),
        ];
        assert!(barycentric(&points, 3.0, 3.0).is_none());
    }

    #[test]
    fn fill_writes_triangle_color() {
        let mut fb = Framebuffer::new(128, 128);
        fill_triangle(&big_triangle(2.0), None, &mut fb);
        let center = fb.get_pixel(60, 50).unwrap();
        assert_eq!(center, Color::new(200, 50, 50).as_argb());
        // Outside stays background
        assert_eq!(fb.get_pixel(5, 5).unwrap(), BACKGROUND);
    }

    #[test]
    fn closer_triangle_wins_regardless_of_draw_order() {
        let near = big_triangle(2.0);
        let far = CanvasTriangle::new(near.points.map(|p| point(p.x, p.y, 5.0)), Color::new(0, 0, 200));

        let mut front_first = Framebuffer::new(128, 128);
        fill_triangle(&near, None, &mut front_first);
        fill_triangle(&far, None, &mut front_first);

        let mut back_first = Framebuffer::new(128, 128);
        fill_triangle(&far, None, &mut back_first);
        fill_triangle(&near, None, &mut back_first);

        let expected = Color::new(200, 50, 50).as_argb();
        assert_eq!(front_first.get_pixel(60, 50).unwrap(), expected);
        assert_eq!(back_first.get_pixel(60, 50).unwrap(), expected);
    }

    #[test]
    fn off_canvas_triangle_is_clipped_silently() {
        let mut fb = Framebuffer::new(64, 64);
        let triangle = CanvasTriangle::new(
            [
                point(-50.0, -10.0, 1.0),
                point(120.0, -5.0, 1.0),
                point(30.0, 200.0, 1.0),
            ],
            Color::WHITE,
        );
        fill_triangle(&triangle, None, &mut fb);
        // Some on-canvas pixels were covered; no panic occurred
        assert_eq!(fb.get_pixel(32, 32).unwrap(), Color::WHITE.as_argb());
    }

    #[test]
    fn zero_height_triangle_is_skipped() {
        let mut fb = Framebuffer::new(64, 64);
        let triangle = CanvasTriangle::new(
            [
                point(10.0, 20.0, 1.0),
                point(30.0, 20.0, 1.0),
                point(50.0, 20.0, 1.0),
            ],
            Color::WHITE,
        );
        fill_triangle(&triangle, None, &mut fb);
        assert!(fb.color_buffer().iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn texture_sampling_uses_perspective_corrected_uvs() {
        // 2x2 texture: left column red, right column green (after V flip
        // both rows sample the same column colours)
        let texture = Texture::from_raw(vec![0xFFFF0000, 0xFF00FF00, 0xFFFF0000, 0xFF00FF00], 2, 2);
        let triangle = CanvasTriangle::new(
            [
                point(0.0, 0.0, 2.0),
                point(100.0, 0.0, 2.0),
                point(0.0, 100.0, 2.0),
            ],
            Color::WHITE,
        )
        .with_texture_points([
            Vec2::new(0.1, 0.5),
            Vec2::new(0.9, 0.5),
            Vec2::new(0.1, 0.5),
        ]);
        let mut fb = Framebuffer::new(128, 128);
        fill_triangle(&triangle, Some(&texture), &mut fb);

        // Near the left edge u ~ 0.1 -> red; near the right corner u -> green
        assert_eq!(fb.get_pixel(5, 2).unwrap(), 0xFFFF0000);
        assert_eq!(fb.get_pixel(90, 2).unwrap(), 0xFF00FF00);
    }
}
