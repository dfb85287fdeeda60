//! Ray/scene intersection queries.
//!
//! The closest-hit query walks the whole triangle list, rejecting most
//! triangles with a cheap bounding-box slab test before solving the
//! barycentric linear system for the survivors.

use crate::math::mat3::Mat3;
use crate::math::vec3::Vec3;
use crate::scene::{Aabb, Scene};

/// A ray with its componentwise inverse direction precomputed for the
/// slab test. Zeros in the direction become positive infinity regardless
/// of the sign of the zero.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let invert = |d: f32| if d == 0.0 { f32::INFINITY } else { 1.0 / d };
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                invert(direction.x),
                invert(direction.y),
                invert(direction.z),
            ),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Slab test against an axis-aligned box. The min/max per axis
    /// swaps branchlessly when a direction component is negative.
    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let t_low = aabb.min - self.origin;
        let t_low = Vec3::new(
            t_low.x * self.inv_direction.x,
            t_low.y * self.inv_direction.y,
            t_low.z * self.inv_direction.z,
        );
        let t_high = aabb.max - self.origin;
        let t_high = Vec3::new(
            t_high.x * self.inv_direction.x,
            t_high.y * self.inv_direction.y,
            t_high.z * self.inv_direction.z,
        );

        let t_near = t_low.min(t_high);
        let t_far = t_low.max(t_high);

        let t_entry = t_near.x.max(t_near.y).max(t_near.z);
        let t_exit = t_far.x.min(t_far.y).min(t_far.z);
        t_exit >= t_entry.max(0.0)
    }
}

/// The result of a successful closest-hit query. Transient per ray.
#[derive(Clone, Copy, Debug)]
pub struct Intersection {
    pub triangle: usize,
    /// Distance along the ray.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Barycentric weights of the hit, ordered like the triangle's
    /// vertices.
    pub weights: [f32; 3],
}

/// Finds the closest valid intersection of `ray` with the scene.
///
/// `exclude` skips one triangle index, so shadow and reflection rays do
/// not re-hit the surface they start from. `max_distance` discards hits
/// beyond it (shadow rays stop at the light). Among equal distances the
/// first triangle in iteration order wins, keeping results deterministic.
pub fn closest_intersection(
    scene: &Scene,
    ray: &Ray,
    exclude: Option<usize>,
    max_distance: Option<f32>,
) -> Option<Intersection> {
    let limit = max_distance.unwrap_or(f32::MAX);
    let mut closest: Option<Intersection> = None;

    for (index, triangle) in scene.triangles.iter().enumerate() {
        if exclude == Some(index) {
            continue;
        }
        if !ray.intersects_aabb(&triangle.aabb) {
            continue;
        }

        let v0 = scene.triangle_vertex(index, 0);
        let e0 = scene.triangle_vertex(index, 1) - v0;
        let e1 = scene.triangle_vertex(index, 2) - v0;
        let sp = ray.origin - v0;

        // Solve [-d e0 e1] * (t, u, v) = origin - v0. A singular matrix
        // means the ray is parallel to the triangle plane.
        let de = Mat3::from_columns(-ray.direction, e0, e1);
        let Some(inverse) = de.inverse() else {
            continue;
        };
        let solution = inverse * sp;
        let (t, u, v) = (solution.x, solution.y, solution.z);

        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) || u + v > 1.0 {
            continue;
        }
        if t < 0.0 || t > limit {
            continue;
        }
        if let Some(best) = &closest {
            if t >= best.distance {
                continue;
            }
        }

        closest = Some(Intersection {
            triangle: index,
            distance: t,
            point: ray.point_at(t),
            weights: [1.0 - u - v, u, v],
        });
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use crate::scene::{Triangle, Vertex};
    use approx::assert_relative_eq;

    /// Two parallel quadless triangles facing +Z at z = 1 and z = 3.
    fn two_walls() -> Scene {
        let vertices = vec![
            // near wall (z = 1)
            Vertex::new(Vec3::new(-1.0, -1.0, 1.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, -1.0, 1.0), Color::WHITE),
            Vertex::new(Vec3::new(0.0, 1.0, 1.0), Color::WHITE),
            // far wall (z = 3)
            Vertex::new(Vec3::new(-1.0, -1.0, 3.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, -1.0, 3.0), Color::WHITE),
            Vertex::new(Vec3::new(0.0, 1.0, 3.0), Color::WHITE),
        ];
        let triangles = vec![
            // Farther triangle enumerated first on purpose
            Triangle::new([3, 4, 5], Color::WHITE),
            Triangle::new([0, 1, 2], Color::WHITE),
        ];
        Scene::new(vertices, triangles, vec![], None)
    }

    #[test]
    fn closest_hit_ignores_enumeration_order() {
        let scene = two_walls();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hit = closest_intersection(&scene, &ray, None, None).unwrap();
        assert_eq!(hit.triangle, 1);
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn excluded_triangle_is_skipped() {
        let scene = two_walls();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hit = closest_intersection(&scene, &ray, Some(1), None).unwrap();
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn max_distance_discards_far_hits() {
        let scene = two_walls();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(closest_intersection(&scene, &ray, Some(1), Some(2.0)).is_none());
    }

    #[test]
    fn miss_returns_none() {
        let scene = two_walls();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(closest_intersection(&scene, &ray, None, None).is_none());
    }

    #[test]
    fn hit_weights_partition_unity() {
        let scene = two_walls();
        let ray = Ray::new(Vec3::new(0.1, -0.2, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = closest_intersection(&scene, &ray, None, None).unwrap();
        assert_relative_eq!(hit.weights.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        assert!(hit.weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
    }

    #[test]
    fn slab_test_rejects_box_behind_ray() {
        let aabb = Aabb {
            min: Vec3::new(-1.0, -1.0, -3.0),
            max: Vec3::new(1.0, 1.0, -1.0),
        };
        let toward = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(toward.intersects_aabb(&aabb));
        assert!(!away.intersects_aabb(&aabb));
    }

    #[test]
    fn slab_test_handles_axis_parallel_ray() {
        // Direction has zero x and y; inverse direction is infinite there
        let aabb = Aabb {
            min: Vec3::new(-1.0, -1.0, 1.0),
            max: Vec3::new(1.0, 1.0, 2.0),
        };
        let inside_column = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let outside_column = Ray::new(Vec3::new(5.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(inside_column.intersects_aabb(&aabb));
        assert!(!outside_column.intersects_aabb(&aabb));
    }
}
