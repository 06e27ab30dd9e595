use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fixstep_physics::{
    broadphase::BruteForce, Body, FVec2, Fixed, MassProps, PhysicsConfig, PhysicsScene,
    ShapeCatalog,
};

fn grid_scene(count: i64, spacing: i64) -> PhysicsScene {
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let ground = catalog.add_box(FVec2::from_int(2000, 10)).unwrap();
    let config = PhysicsConfig {
        pair_capacity: 4096,
        ..PhysicsConfig::default()
    };
    let mut scene = PhysicsScene::new(config, catalog).unwrap();
    scene.add_body(Body {
        mass: MassProps::STATIC,
        ..Body::new(FVec2::from_int(0, -20), ground)
    });
    for i in 0..count {
        let position = FVec2::from_int((i % 25) * spacing, (i / 25) * spacing);
        scene.add_body(Body {
            linear_velocity: FVec2::from_int((i % 7) - 3, -((i % 5) + 1)),
            ..Body::new(position, circle)
        });
    }
    scene
}

fn bench_scene_update(c: &mut Criterion) {
    let dt = Fixed::from_ratio(1, 60);

    c.bench_function("update_100_bodies_sparse", |b| {
        let mut scene = grid_scene(100, 30);
        b.iter(|| {
            scene.update(dt).unwrap();
            black_box(scene.state_hash());
        })
    });

    c.bench_function("update_500_bodies_packed", |b| {
        let mut scene = grid_scene(500, 19);
        b.iter(|| {
            scene.update(dt).unwrap();
            black_box(scene.state_hash());
        })
    });
}

fn bench_broad_phase(c: &mut Criterion) {
    let dt = Fixed::from_ratio(1, 60);

    c.bench_function("brute_force_500_bodies", |b| {
        let mut scene = grid_scene(500, 19);
        scene.set_broad_phase_strategy(Box::new(BruteForce::default()));
        b.iter(|| {
            scene.update(dt).unwrap();
            black_box(scene.active_pairs());
        })
    });
}

criterion_group!(benches, bench_scene_update, bench_broad_phase);
criterion_main!(benches);
