//! Benchmarks for the per-frame update and geometry generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use orbshell::shapes::node_positions;
use orbshell::{OrbConfig, RenderBuffers, Scene, ShellMesh, Shape};

fn scene_for(shape: Shape) -> Scene {
    let mut scene = Scene::new(OrbConfig::default().with_seed(1)).expect("default config is valid");
    scene.regenerate_shape(shape);
    scene
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for shape in Shape::ALL {
        group.bench_with_input(BenchmarkId::new("intact", shape), &shape, |b, &shape| {
            let mut scene = scene_for(shape);
            let mut time = 0.0f32;
            b.iter(|| {
                time += 1.0 / 60.0;
                scene.tick(black_box(time));
            })
        });
    }

    group.bench_function("shattered_sphere", |b| {
        let mut scene = scene_for(Shape::Sphere);
        scene.break_near(Vec3::ZERO, 100.0);
        let mut time = 0.0f32;
        b.iter(|| {
            time += 1.0 / 60.0;
            scene.tick(black_box(time));
        })
    });

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for shape in Shape::ALL {
        group.bench_with_input(BenchmarkId::new("nodes", shape), &shape, |b, &shape| {
            b.iter(|| black_box(node_positions(shape, 1000, 3.0)))
        });
        group.bench_with_input(BenchmarkId::new("shell", shape), &shape, |b, &shape| {
            b.iter(|| black_box(ShellMesh::for_shape(shape, 3.0)))
        });
    }

    group.finish();
}

fn bench_buffers(c: &mut Criterion) {
    let scene = scene_for(Shape::Torus);
    let mut buffers = RenderBuffers::default();
    c.bench_function("refill_buffers_torus", |b| {
        b.iter(|| {
            buffers.refill(black_box(&scene));
        })
    });
}

criterion_group!(benches, bench_tick, bench_generation, bench_buffers);
criterion_main!(benches);
