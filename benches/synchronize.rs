//! Benchmarks for the per-frame rope work.
//!
//! Run with: `cargo bench`

use clothesline::{Aabb, AttachedObject, MeshHandle, OrientationConfig, PhysicsEngine, Rope, RopeConfig, VerletWorld};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

fn build(segments: usize) -> (VerletWorld, Rope) {
    let mut world = VerletWorld::default();
    let config = RopeConfig::new().with_segment_count(segments);
    let mut rope = Rope::new(&mut world, &config).expect("valid rope");
    for node in (4..segments).step_by(4) {
        let object = AttachedObject::new(MeshHandle(0), Aabb::from_half_extents(Vec3::splat(0.1)));
        rope.attach(object, node).expect("free node");
    }
    // Put some sag into the rope so segments are not all identical.
    for _ in 0..30 {
        world.step(1.0 / 60.0);
    }
    (world, rope)
}

fn bench_synchronize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronize");
    for segments in [56usize, 256, 1024] {
        let (world, mut rope) = build(segments);
        group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, _| {
            b.iter(|| {
                rope.synchronize(black_box(&world));
                black_box(rope.instances().len())
            })
        });
    }
    group.finish();
}

fn bench_orientations(c: &mut Criterion) {
    let (world, mut rope) = build(256);
    let config = OrientationConfig::new();
    c.bench_function("update_orientations_256", |b| {
        b.iter(|| rope.update_orientations(black_box(&world), &config))
    });
}

fn bench_step(c: &mut Criterion) {
    let (mut world, _rope) = build(256);
    c.bench_function("verlet_step_256", |b| b.iter(|| world.step(black_box(1.0 / 60.0))));
}

criterion_group!(benches, bench_synchronize, bench_orientations, bench_step);
criterion_main!(benches);
