//! The shading model.
//!
//! Lighting combines four independently toggleable terms: ambient (flat
//! additive colour), proximity (inverse-square falloff), incidence
//! (Lambertian) and specular (Phong). Diffuse = proximity x incidence.
//! Two strategies exist: Gouraud precomputes the terms per vertex into a
//! [`ShadingCache`] and blends the results per pixel; Phong evaluates the
//! full formula per pixel against an interpolated normal.
//!
//! All toggles and tuning constants travel in a [`LightingConfig`] value
//! so nothing reads hidden global state.

use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::scene::Scene;

/// Flat ambient contribution added wherever ambient lighting is enabled.
pub const AMBIENT_COLOR: Color = Color::new(20, 20, 20);
/// Colour of the single scene light, scaling the specular term.
pub const LIGHT_COLOR: Color = Color::new(255, 255, 255);

/// Lighting toggles and tuning constants.
///
/// The scalar constants are exposed rather than hard-coded because the
/// pleasing values are a visual-tuning choice, not a contract; the
/// defaults are the ones the reference scene was tuned with.
#[derive(Clone, Copy, Debug)]
pub struct LightingConfig {
    pub ambient: bool,
    pub proximity: bool,
    pub incidence: bool,
    pub specular: bool,
    pub hard_shadows: bool,
    pub soft_shadows: bool,
    pub reflections: bool,
    /// Per-pixel (Phong) shading when true, per-vertex (Gouraud) when false.
    pub phong: bool,
    /// Edge-aware blur pass over the finished ray-traced frame.
    pub filter: bool,

    /// Point-light power feeding the inverse-square proximity term.
    pub light_intensity: f32,
    /// Scale applied to the Lambertian dot product.
    pub incidence_scale: f32,
    /// Phong specular exponent.
    pub shininess: f32,
    /// Number of jittered shadow rays per pixel when soft shadows are on.
    pub soft_shadow_samples: u32,
    /// Standard deviation of the jitter around the light position.
    pub soft_shadow_radius: f32,
    /// Base seed for the soft-shadow sample jitter.
    pub seed: u64,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: true,
            proximity: false,
            incidence: false,
            specular: true,
            hard_shadows: true,
            soft_shadows: false,
            reflections: false,
            phong: false,
            filter: false,
            light_intensity: 5.0,
            incidence_scale: 0.5,
            shininess: 128.0,
            soft_shadow_samples: 24,
            soft_shadow_radius: 0.1,
            seed: 0,
        }
    }
}

/// The diffuse and specular scalars produced by the lighting formula for
/// one surface point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightAttributes {
    pub diffuse: f32,
    pub specular: f32,
}

/// Evaluates the toggleable lighting terms at a surface point.
///
/// Disabled terms contribute their neutral value (1.0 for proximity and
/// incidence, 0.0 for specular), so diffuse stays meaningful under any
/// combination of toggles.
pub fn light_attributes(
    normal: Vec3,
    light_position: Vec3,
    camera_position: Vec3,
    position: Vec3,
    config: &LightingConfig,
) -> LightAttributes {
    let light_direction = (light_position - position).normalize();
    let light_distance = light_position.distance(position);

    let mut proximity = 1.0;
    if config.proximity {
        proximity =
            config.light_intensity / (4.0 * std::f32::consts::PI * light_distance.powi(2));
    }

    let mut incidence = 1.0;
    if config.incidence {
        incidence = (normal.dot(light_direction) * config.incidence_scale).max(0.0);
    }

    let mut specular = 0.0;
    if config.specular {
        let reflection = (-light_direction).reflect(normal);
        let view_direction = (camera_position - position).normalize();
        let specularity = reflection.dot(view_direction).max(0.0);
        specular = specularity.powf(config.shininess);
    }

    LightAttributes {
        diffuse: proximity * incidence,
        specular,
    }
}

/// Precomputed Gouraud terms for one vertex. The ray tracer blends these
/// per pixel and adds the flat ambient term itself, since ambient does
/// not vary across the surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexShading {
    pub diffuse: Color,
    pub specular: Color,
}

/// Per-vertex shading results, parallel to the scene's vertex list.
///
/// Kept separate from the geometry so topology stays immutable and the
/// cache can be rebuilt or diffed on its own.
pub struct ShadingCache {
    entries: Vec<VertexShading>,
}

impl ShadingCache {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            entries: vec![VertexShading::default(); vertex_count],
        }
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> &VertexShading {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recomputes every vertex's lighting terms. Run whenever the light
    /// position, camera position or lighting toggles change.
    pub fn preprocess(
        &mut self,
        scene: &Scene,
        light_position: Vec3,
        camera_position: Vec3,
        config: &LightingConfig,
    ) {
        self.entries.resize(scene.vertices.len(), VertexShading::default());
        for (entry, vertex) in self.entries.iter_mut().zip(&scene.vertices) {
            let attributes = light_attributes(
                vertex.normal,
                light_position,
                camera_position,
                vertex.position,
                config,
            );

            entry.diffuse = vertex.color * attributes.diffuse;
            entry.specular = LIGHT_COLOR * attributes.specular;
        }
    }
}
