use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use raybox::camera::Camera;
use raybox::colors::Color;
use raybox::lighting::{LightingConfig, ShadingCache};
use raybox::math::vec3::Vec3;
use raybox::projector::{CanvasPoint, Projector, CANVAS_HEIGHT, CANVAS_WIDTH};
use raybox::raytrace;
use raybox::render::scanline::fill_triangle;
use raybox::render::{CanvasTriangle, Framebuffer};
use raybox::scene::{Scene, Triangle, Vertex};

fn point(x: f32, y: f32) -> CanvasPoint {
    CanvasPoint { x, y, depth: 2.0 }
}

fn small_triangle() -> CanvasTriangle {
    CanvasTriangle::new(
        [point(100.0, 100.0), point(120.0, 100.0), point(110.0, 120.0)],
        Color::new(200, 0, 0),
    )
}

fn medium_triangle() -> CanvasTriangle {
    CanvasTriangle::new(
        [point(60.0, 40.0), point(260.0, 60.0), point(160.0, 200.0)],
        Color::new(200, 0, 0),
    )
}

fn large_triangle() -> CanvasTriangle {
    CanvasTriangle::new(
        [point(10.0, 10.0), point(310.0, 30.0), point(160.0, 230.0)],
        Color::new(200, 0, 0),
    )
}

/// An open box of five quads around the origin, enough geometry for the
/// ray tracer to do real intersection work.
fn box_scene() -> Scene {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let walls: [[Vec3; 4]; 5] = [
        // floor
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
        // ceiling
        [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
        // back
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
        // left
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
        // right
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ],
    ];
    for corners in walls {
        let color = Color::new(180, 180, 180);
        let base = vertices.len() as u32;
        vertices.extend(corners.map(|p| Vertex::new(p, color)));
        triangles.push(Triangle::new([base, base + 1, base + 2], color));
        triangles.push(Triangle::new([base, base + 2, base + 3], color));
    }
    Scene::new(vertices, triangles, vec![], None)
}

fn benchmark_scanline_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanline_fill");

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &triangle, |b, tri| {
            let mut fb = Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
            b.iter(|| {
                fill_triangle(black_box(tri), None, &mut fb);
            });
        });
    }

    group.finish();
}

fn benchmark_raytrace_frame(c: &mut Criterion) {
    let scene = box_scene();
    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO);
    let projector = Projector::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let light = Vec3::new(0.0, 0.9, 0.0);

    let mut group = c.benchmark_group("raytrace_frame");
    group.sample_size(10);

    for (name, config) in [
        (
            "hard_shadows",
            LightingConfig::default(),
        ),
        (
            "soft_shadows",
            LightingConfig {
                soft_shadows: true,
                ..LightingConfig::default()
            },
        ),
        (
            "phong_reflections",
            LightingConfig {
                phong: true,
                reflections: true,
                ..LightingConfig::default()
            },
        ),
    ] {
        let mut cache = ShadingCache::new(scene.vertices.len());
        cache.preprocess(&scene, light, camera.position(), &config);

        group.bench_function(name, |b| {
            let mut fb = Framebuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
            b.iter(|| {
                raytrace::render_frame(
                    black_box(&scene),
                    &camera,
                    &projector,
                    light,
                    &config,
                    &cache,
                    &mut fb,
                );
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scanline_fill, benchmark_raytrace_frame);
criterion_main!(benches);
