//! OBJ/MTL scene loading.
//!
//! Geometry comes in through `tobj` with triangulation enabled, so
//! polygonal faces arrive as triangle fans. Each model's material
//! supplies the flat surface colour; an `illum 5` material is treated as
//! a mirror. The first material carrying a diffuse texture map provides
//! the scene texture, with per-corner UVs resolved through the OBJ's
//! separate texture-coordinate index stream.

use std::path::Path;

use thiserror::Error;

use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::scene::{Scene, Triangle, Vertex};
use crate::texture::Texture;

/// Mirror blend factor assigned to `illum 5` (mirror) materials.
const MIRROR_REFLECTIVITY: f32 = 0.8;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to load texture image: {0}")]
    Image(#[from] image::ImageError),
    #[error("OBJ contained no triangles")]
    EmptyScene,
}

/// Loads an OBJ file (and its MTL, if present) into a [`Scene`], scaling
/// every vertex position by `scale`.
pub fn load_scene<P: AsRef<Path>>(path: P, scale: f32) -> Result<Scene, LoadError> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        },
    )?;
    let materials = materials.unwrap_or_else(|error| {
        log::warn!("no usable MTL for {}: {error}", path.display());
        Vec::new()
    });

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut texture_points = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let material = mesh.material_id.and_then(|id| materials.get(id));
        let color = material
            .and_then(|m| m.diffuse)
            .map(diffuse_to_color)
            .unwrap_or(Color::WHITE);
        let reflectivity = match material.and_then(|m| m.illumination_model) {
            Some(5) => MIRROR_REFLECTIVITY,
            _ => 0.0,
        };

        let vertex_base = vertices.len() as u32;
        for position in mesh.positions.chunks_exact(3) {
            vertices.push(Vertex::new(
                Vec3::new(position[0], position[1], position[2]) * scale,
                color,
            ));
        }

        let uv_base = texture_points.len() as u32;
        for uv in mesh.texcoords.chunks_exact(2) {
            texture_points.push(Vec2::new(uv[0], uv[1]));
        }

        let has_uvs = mesh.texcoord_indices.len() == mesh.indices.len();
        for (face, corners) in mesh.indices.chunks_exact(3).enumerate() {
            let mut triangle = Triangle::new(
                [
                    vertex_base + corners[0],
                    vertex_base + corners[1],
                    vertex_base + corners[2],
                ],
                color,
            )
            .with_reflectivity(reflectivity);
            if has_uvs {
                let uvs = &mesh.texcoord_indices[face * 3..face * 3 + 3];
                triangle =
                    triangle.with_texture_points([uv_base + uvs[0], uv_base + uvs[1], uv_base + uvs[2]]);
            }
            triangles.push(triangle);
        }
    }

    if triangles.is_empty() {
        return Err(LoadError::EmptyScene);
    }

    let texture = load_texture(path, &materials)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles{}",
        path.display(),
        vertices.len(),
        triangles.len(),
        if texture.is_some() { ", textured" } else { "" },
    );

    Ok(Scene::new(vertices, triangles, texture_points, texture))
}

/// Decodes the first diffuse texture map named by the materials, resolved
/// relative to the OBJ file's directory.
fn load_texture(obj_path: &Path, materials: &[tobj::Material]) -> Result<Option<Texture>, LoadError> {
    let Some(name) = materials
        .iter()
        .find_map(|material| material.diffuse_texture.as_deref())
    else {
        return Ok(None);
    };
    let directory = obj_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(Some(Texture::from_file(directory.join(name))?))
}

fn diffuse_to_color(diffuse: [f32; 3]) -> Color {
    Color::new(
        (diffuse[0] * 255.0).clamp(0.0, 255.0) as u8,
        (diffuse[1] * 255.0).clamp(0.0, 255.0) as u8,
        (diffuse[2] * 255.0).clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn quad_face_is_triangulated() {
        let path = write_temp(
            "loader_quad_test.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        let scene = load_scene(&path, 1.0).unwrap();
        assert_eq!(scene.vertices.len(), 4);
        assert_eq!(scene.triangles.len(), 2);
        // No material: white with no mirror blend
        assert_eq!(scene.triangles[0].color, Color::WHITE);
        assert_eq!(scene.triangles[0].reflectivity, 0.0);
    }

    #[test]
    fn scale_is_applied_to_positions() {
        let path = write_temp(
            "loader_scale_test.obj",
            "v 2 0 0\nv 0 2 0\nv 0 0 2\nf 1 2 3\n",
        );
        let scene = load_scene(&path, 0.5).unwrap();
        assert_eq!(scene.vertices[0].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(scene.vertices[2].position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn file_without_faces_is_an_empty_scene() {
        let path = write_temp("loader_empty_test.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\n");
        assert!(matches!(
            load_scene(&path, 1.0),
            Err(LoadError::EmptyScene)
        ));
    }

    #[test]
    fn diffuse_color_conversion_scales_and_clamps() {
        assert_eq!(diffuse_to_color([1.0, 0.5, 0.0]), Color::new(255, 127, 0));
        assert_eq!(diffuse_to_color([2.0, -1.0, 0.2]), Color::new(255, 0, 51));
    }
}
