//! Triangle-mesh scene data.
//!
//! Topology (vertices, triangles, texture coordinates, adjacency) is
//! immutable after load. Everything derivable from it — face normals,
//! bounding boxes, averaged vertex normals — is recomputed by
//! [`Scene::finalize`], and per-frame shading state lives in a separate
//! cache (see [`crate::lighting::ShadingCache`]) so geometry never has to
//! be mutated during rendering.

use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// A mesh vertex: position, averaged unit normal, and the flat colour of
/// the surface it belongs to (used as the Gouraud base colour).
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
            color,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: [Vec3; 3]) -> Self {
        Self {
            min: points[0].min(points[1]).min(points[2]),
            max: points[0].max(points[1]).max(points[2]),
        }
    }
}

/// A triangle referencing vertices by index into the scene's vertex list.
///
/// Texture-coordinate indices are `None` for untextured surfaces (the
/// loader translates the OBJ sentinel). The bounding box and face normal
/// are derived data, kept in sync by [`Scene::finalize`].
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub texture_points: Option<[u32; 3]>,
    pub color: Color,
    pub normal: Vec3,
    pub aabb: Aabb,
    /// Mirror blend factor in [0, 1]; 0 means fully matte.
    pub reflectivity: f32,
}

impl Triangle {
    pub fn new(vertices: [u32; 3], color: Color) -> Self {
        Self {
            vertices,
            texture_points: None,
            color,
            normal: Vec3::ZERO,
            aabb: Aabb {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            },
            reflectivity: 0.0,
        }
    }

    pub fn with_texture_points(mut self, points: [u32; 3]) -> Self {
        self.texture_points = Some(points);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }
}

/// A loaded scene: shared vertex list, triangle list, texture-coordinate
/// list, optional texture map, and the vertex-to-triangle adjacency used
/// for normal averaging.
pub struct Scene {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub texture_points: Vec<Vec2>,
    pub texture: Option<Texture>,
    /// Triangle indices touching each vertex. Built once; topology never
    /// changes after load.
    adjacency: Vec<Vec<u32>>,
}

impl Scene {
    /// Assembles a scene and computes all derived data.
    pub fn new(
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        texture_points: Vec<Vec2>,
        texture: Option<Texture>,
    ) -> Self {
        let mut scene = Self {
            vertices,
            triangles,
            texture_points,
            texture,
            adjacency: Vec::new(),
        };
        scene.finalize();
        scene
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Position of vertex `corner` (0..3) of triangle `triangle`.
    #[inline]
    pub fn triangle_vertex(&self, triangle: usize, corner: usize) -> Vec3 {
        self.vertices[self.triangles[triangle].vertices[corner] as usize].position
    }

    /// Texture coordinates of a textured triangle's three corners.
    pub fn triangle_texture_points(&self, triangle: usize) -> Option<[Vec2; 3]> {
        self.triangles[triangle].texture_points.map(|indices| {
            [
                self.texture_points[indices[0] as usize],
                self.texture_points[indices[1] as usize],
                self.texture_points[indices[2] as usize],
            ]
        })
    }

    /// Triangles sharing the given vertex.
    pub fn triangles_of_vertex(&self, vertex: usize) -> &[u32] {
        &self.adjacency[vertex]
    }

    /// Recomputes face normals, bounding boxes, adjacency and averaged
    /// vertex normals. Must be called after any geometry change.
    pub fn finalize(&mut self) {
        self.adjacency = vec![Vec::new(); self.vertices.len()];

        for index in 0..self.triangles.len() {
            let points = [
                self.triangle_vertex(index, 0),
                self.triangle_vertex(index, 1),
                self.triangle_vertex(index, 2),
            ];
            let edge0 = points[1] - points[0];
            let edge1 = points[2] - points[0];
            let cross = edge0.cross(edge1);
            // Zero-area triangles keep a zero normal and are skipped by
            // the per-pixel code downstream.
            self.triangles[index].normal = if cross.magnitude() > f32::EPSILON {
                cross.normalize()
            } else {
                Vec3::ZERO
            };
            self.triangles[index].aabb = Aabb::from_points(points);

            for &vertex in &self.triangles[index].vertices {
                self.adjacency[vertex as usize].push(index as u32);
            }
        }

        self.average_vertex_normals();
    }

    /// Averages the face normals of all adjacent triangles into each
    /// vertex normal (the smooth normals used by Gouraud and Phong).
    fn average_vertex_normals(&mut self) {
        for (vertex_index, adjacent) in self.adjacency.iter().enumerate() {
            if adjacent.is_empty() {
                continue;
            }
            let mut sum = Vec3::ZERO;
            for &triangle in adjacent {
                sum = sum + self.triangles[triangle as usize].normal;
            }
            let averaged = sum / adjacent.len() as f32;
            self.vertices[vertex_index].normal = if averaged.magnitude() > f32::EPSILON {
                averaged.normalize()
            } else {
                Vec3::ZERO
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_triangle_scene() -> Scene {
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Color::WHITE),
        ];
        let triangles = vec![Triangle::new([0, 1, 2], Color::WHITE)];
        Scene::new(vertices, triangles, vec![], None)
    }

    #[test]
    fn face_normal_is_unit_and_perpendicular() {
        let scene = single_triangle_scene();
        let normal = scene.triangles[0].normal;
        assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(normal.z.abs(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn bounding_box_covers_all_vertices() {
        let scene = single_triangle_scene();
        let aabb = scene.triangles[0].aabb;
        assert_relative_eq!(aabb.min.x, 0.0);
        assert_relative_eq!(aabb.min.y, 0.0);
        assert_relative_eq!(aabb.max.x, 1.0);
        assert_relative_eq!(aabb.max.y, 1.0);
    }

    #[test]
    fn adjacency_lists_every_incident_triangle() {
        // Two triangles sharing vertices 0 and 2
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Color::WHITE),
        ];
        let triangles = vec![
            Triangle::new([0, 1, 2], Color::WHITE),
            Triangle::new([0, 2, 3], Color::WHITE),
        ];
        let scene = Scene::new(vertices, triangles, vec![], None);
        assert_eq!(scene.triangles_of_vertex(0), &[0, 1]);
        assert_eq!(scene.triangles_of_vertex(1), &[0]);
        assert_eq!(scene.triangles_of_vertex(2), &[0, 1]);
    }

    #[test]
    fn vertex_normals_average_coplanar_faces() {
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Color::WHITE),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Color::WHITE),
        ];
        let triangles = vec![
            Triangle::new([0, 1, 2], Color::WHITE),
            Triangle::new([0, 2, 3], Color::WHITE),
        ];
        let scene = Scene::new(vertices, triangles, vec![], None);
        for vertex in &scene.vertices {
            assert_relative_eq!(vertex.normal.magnitude(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(vertex.normal.z.abs(), 1.0, epsilon = 1e-6);
        }
    }
}
