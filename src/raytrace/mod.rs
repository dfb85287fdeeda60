//! Ray-traced render path.
//!
//! Every canvas pixel gets a primary ray through the projector; the
//! closest hit is shaded with the same toggleable lighting terms the
//! rasterizer's preprocess uses, plus shadow rays (hard or jittered
//! soft), optional Phong per-pixel evaluation against interpolated
//! normals, and a single mirror bounce for reflective surfaces.
//!
//! The frame is split into horizontal bands rendered in parallel. Each
//! band owns a seeded RNG, so a frame is deterministic for a given seed
//! no matter how the bands are scheduled.

pub mod intersect;

pub use intersect::{closest_intersection, Intersection, Ray};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::colors::{self, Color};
use crate::lighting::{light_attributes, LightingConfig, ShadingCache, AMBIENT_COLOR, LIGHT_COLOR};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::projector::Projector;
use crate::render::Framebuffer;
use crate::scene::Scene;

/// Number of horizontal bands rendered in parallel.
const NUM_BANDS: usize = 4;

/// Offset applied along the surface normal when spawning secondary rays,
/// keeping them clear of the surface they start from.
const SURFACE_OFFSET: f32 = 0.01;

/// Mirror bounces per primary ray.
const REFLECTION_DEPTH: u32 = 1;

/// Ray traces the whole frame into the framebuffer's colour buffer.
///
/// The shading cache must be preprocessed for the current light, camera
/// and config when Gouraud shading is active (`config.phong == false`).
pub fn render_frame(
    scene: &Scene,
    camera: &Camera,
    projector: &Projector,
    light_position: Vec3,
    config: &LightingConfig,
    cache: &ShadingCache,
    fb: &mut Framebuffer,
) {
    let width = fb.width() as usize;
    let height = fb.height() as usize;
    let rows_per_band = height.div_ceil(NUM_BANDS);

    let tracer = Tracer {
        scene,
        camera,
        projector,
        light_position,
        config,
        cache,
    };

    fb.color_buffer_mut()
        .par_chunks_mut(rows_per_band * width)
        .enumerate()
        .for_each(|(band, rows)| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(band as u64));
            let y_start = band * rows_per_band;
            for (offset, pixel) in rows.iter_mut().enumerate() {
                let x = offset % width;
                let y = y_start + offset / width;
                *pixel = tracer.trace_pixel(x as f32, y as f32, &mut rng);
            }
        });
}

struct Tracer<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    projector: &'a Projector,
    light_position: Vec3,
    config: &'a LightingConfig,
    cache: &'a ShadingCache,
}

impl Tracer<'_> {
    fn trace_pixel(&self, x: f32, y: f32, rng: &mut StdRng) -> u32 {
        let ray = self.projector.pixel_ray(self.camera, x, y);
        match closest_intersection(self.scene, &ray, None, None) {
            Some(hit) => self.shade(&ray, &hit, rng, REFLECTION_DEPTH).as_argb(),
            None => colors::BACKGROUND,
        }
    }

    fn shade(&self, ray: &Ray, hit: &Intersection, rng: &mut StdRng, depth: u32) -> Color {
        let triangle = &self.scene.triangles[hit.triangle];
        // Flip the normal to face the incoming ray, so secondary rays
        // always leave on the visible side of the surface.
        let mut normal = self.interpolated_normal(hit);
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        let shadow = self.shadow_factor(hit, normal, rng);

        let ambient = if self.config.ambient {
            AMBIENT_COLOR
        } else {
            Color::BLACK
        };

        let textured = self
            .scene
            .texture
            .as_ref()
            .zip(self.scene.triangle_texture_points(hit.triangle));

        let color = if self.config.phong || textured.is_some() {
            // Per-pixel evaluation against the interpolated normal; the
            // base colour comes from the texture when the surface has one.
            let base = match textured {
                Some((texture, uvs)) => {
                    let uv = blend_uvs(hit.weights, uvs);
                    Color::from_argb(texture.sample(uv.x, uv.y))
                }
                None => triangle.color,
            };
            let attributes = light_attributes(
                normal,
                self.light_position,
                self.camera.position(),
                hit.point,
                self.config,
            );
            ambient
                + base * (attributes.diffuse * shadow)
                + LIGHT_COLOR * (attributes.specular * shadow)
        } else {
            // Gouraud: blend the preprocessed per-vertex terms. Shadowed
            // pixels keep only the ambient contribution.
            let shadings = triangle
                .vertices
                .map(|index| self.cache.vertex(index as usize));
            let diffuse = blend_colors(hit.weights, shadings.map(|s| s.diffuse));
            let specular = blend_colors(hit.weights, shadings.map(|s| s.specular));
            ambient + (diffuse + specular) * shadow
        };

        if depth > 0 && self.config.reflections && triangle.reflectivity > 0.0 {
            let reflected = self.reflect(ray, hit, normal, rng, depth);
            let mirror = triangle.reflectivity;
            return color * (1.0 - mirror) + reflected * mirror;
        }
        color
    }

    fn reflect(
        &self,
        ray: &Ray,
        hit: &Intersection,
        normal: Vec3,
        rng: &mut StdRng,
        depth: u32,
    ) -> Color {
        let direction = ray.direction.reflect(normal).normalize();
        let bounce = Ray::new(hit.point + normal * SURFACE_OFFSET, direction);
        match closest_intersection(self.scene, &bounce, Some(hit.triangle), None) {
            Some(next) => self.shade(&bounce, &next, rng, depth - 1),
            None => Color::from_argb(colors::BACKGROUND),
        }
    }

    /// Smooth surface normal at the hit point, blended from the vertex
    /// normals. Falls back to the face normal when the blend degenerates.
    fn interpolated_normal(&self, hit: &Intersection) -> Vec3 {
        let triangle = &self.scene.triangles[hit.triangle];
        let mut blended = Vec3::ZERO;
        for (corner, weight) in hit.weights.iter().enumerate() {
            let vertex = triangle.vertices[corner] as usize;
            blended = blended + self.scene.vertices[vertex].normal * *weight;
        }
        if blended.magnitude() > f32::EPSILON {
            blended.normalize()
        } else {
            triangle.normal
        }
    }

    /// Fraction of the light reaching the hit point: 1.0 fully lit, 0.0
    /// fully shadowed, fractional inside a soft-shadow penumbra.
    fn shadow_factor(&self, hit: &Intersection, normal: Vec3, rng: &mut StdRng) -> f32 {
        if self.config.soft_shadows {
            self.soft_shadow_factor(hit, normal, rng)
        } else if self.config.hard_shadows {
            if self.occluded(hit, normal, self.light_position) {
                0.0
            } else {
                1.0
            }
        } else {
            1.0
        }
    }

    /// Casts jittered shadow rays toward points scattered around the
    /// light and returns the unoccluded fraction.
    fn soft_shadow_factor(&self, hit: &Intersection, normal: Vec3, rng: &mut StdRng) -> f32 {
        // The normal already faces the camera, so a surface turned away
        // from the light shadows itself; skip the sample loop.
        if normal.dot(self.light_position - hit.point) <= 0.0 {
            return 0.0;
        }
        let samples = self.config.soft_shadow_samples.max(1);
        let radius = self.config.soft_shadow_radius;
        let mut unoccluded = 0u32;
        for _ in 0..samples {
            let jitter = Vec3::new(
                rng.sample::<f32, _>(StandardNormal),
                rng.sample::<f32, _>(StandardNormal),
                rng.sample::<f32, _>(StandardNormal),
            ) * radius;
            if !self.occluded(hit, normal, self.light_position + jitter) {
                unoccluded += 1;
            }
        }
        unoccluded as f32 / samples as f32
    }

    fn occluded(&self, hit: &Intersection, normal: Vec3, light: Vec3) -> bool {
        let origin = hit.point + normal * SURFACE_OFFSET;
        let to_light = light - origin;
        let distance = to_light.magnitude();
        if distance < f32::EPSILON {
            return false;
        }
        let shadow_ray = Ray::new(origin, to_light / distance);
        closest_intersection(self.scene, &shadow_ray, Some(hit.triangle), Some(distance)).is_some()
    }
}

/// Blends three colours with barycentric weights in floating point, then
/// clamps back to channel range.
fn blend_colors(weights: [f32; 3], colors: [Color; 3]) -> Color {
    let mut red = 0.0f32;
    let mut green = 0.0f32;
    let mut blue = 0.0f32;
    for (color, weight) in colors.iter().zip(weights) {
        red += color.red as f32 * weight;
        green += color.green as f32 * weight;
        blue += color.blue as f32 * weight;
    }
    Color::new(
        red.clamp(0.0, 255.0) as u8,
        green.clamp(0.0, 255.0) as u8,
        blue.clamp(0.0, 255.0) as u8,
    )
}

fn blend_uvs(weights: [f32; 3], uvs: [Vec2; 3]) -> Vec2 {
    uvs[0] * weights[0] + uvs[1] * weights[1] + uvs[2] * weights[2]
}
