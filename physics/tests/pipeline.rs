use fixstep_physics::{
    broadphase::BruteForce, Body, BodyHandle, FVec2, Fixed, MassProps, Material, OverflowPolicy,
    PhysicsConfig, PhysicsError, PhysicsScene, ShapeCatalog,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

fn dt() -> Fixed {
    Fixed::from_ratio(1, 60)
}

fn bouncy() -> Material {
    Material::new(Fixed::ZERO, Fixed::ONE, Fixed::ONE)
}

fn random_scene(seed: u64, config: PhysicsConfig) -> PhysicsScene {
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let square = catalog.add_box(FVec2::from_int(8, 8)).unwrap();
    let wall = catalog.add_box(FVec2::from_int(10, 200)).unwrap();
    let mut scene = PhysicsScene::new(config, catalog).unwrap();

    for &x in [-210, 210].iter() {
        scene.add_body(Body {
            mass: MassProps::STATIC,
            ..Body::new(FVec2::from_int(x, 0), wall)
        });
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    for i in 0..60 {
        let collider = if i % 3 == 0 { square } else { circle };
        scene.add_body(Body {
            rotation: Fixed::from_ratio(rng.gen_range(-30..30), 10),
            linear_velocity: FVec2::from_int(rng.gen_range(-150..150), rng.gen_range(-150..150)),
            angular_velocity: Fixed::from_ratio(rng.gen_range(-10..10), 10),
            material: Material::new(
                Fixed::from_ratio(rng.gen_range(0..10), 10),
                Fixed::from_ratio(rng.gen_range(0..10), 10),
                Fixed::from_ratio(99, 100),
            ),
            ..Body::new(
                FVec2::from_int(rng.gen_range(-180..180), rng.gen_range(-180..180)),
                collider,
            )
        });
    }
    scene
}

fn run_hashes(seed: u64, ticks: usize) -> Vec<u64> {
    let mut scene = random_scene(seed, PhysicsConfig::default());
    (0..ticks)
        .map(|_| {
            scene.update(dt()).unwrap();
            scene.state_hash()
        })
        .collect()
}

#[test]
fn test_same_input_same_trajectory() {
    for seed in 0..4 {
        assert_eq!(run_hashes(seed, 200), run_hashes(seed, 200), "seed {}", seed);
    }
    assert_ne!(run_hashes(1, 10), run_hashes(2, 10));
}

#[test]
fn test_broad_phase_strategies_agree() {
    let mut sweep = random_scene(7, PhysicsConfig::default());
    let mut brute = random_scene(7, PhysicsConfig::default());
    brute.set_broad_phase_strategy(Box::new(BruteForce::default()));
    for _ in 0..120 {
        sweep.update(dt()).unwrap();
        brute.update(dt()).unwrap();
        assert_eq!(sweep.active_pairs(), brute.active_pairs());
        assert_eq!(sweep.state_hash(), brute.state_hash());
    }
}

fn head_on(material: Material) -> (PhysicsScene, BodyHandle, BodyHandle) {
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(100)).unwrap();
    let mut scene = PhysicsScene::new(PhysicsConfig::default(), catalog).unwrap();
    let a = scene.add_body(Body {
        linear_velocity: FVec2::from_int(500, 0),
        material,
        ..Body::new(FVec2::from_int(-150, 0), circle)
    });
    let b = scene.add_body(Body {
        linear_velocity: FVec2::from_int(-500, 0),
        material,
        ..Body::new(FVec2::from_int(150, 0), circle)
    });

    for _ in 0..30 {
        scene.update(dt()).unwrap();
    }
    (scene, a, b)
}

#[test]
fn test_head_on_elastic_collision() {
    let (scene, a, b) = head_on(bouncy());

    let va = scene.body(a).unwrap().linear_velocity;
    let vb = scene.body(b).unwrap().linear_velocity;
    assert!((va.x.to_f64() + 500.0).abs() < 1.0, "a {:?}", va);
    assert!((vb.x.to_f64() - 500.0).abs() < 1.0, "b {:?}", vb);
    assert!(va.y.to_f64().abs() < 1.0);
    assert!(scene.body(a).unwrap().position.x < scene.body(b).unwrap().position.x);
}

#[test]
fn test_head_on_inelastic_collision() {
    let (scene, a, b) = head_on(Material::new(Fixed::ZERO, Fixed::ZERO, Fixed::ONE));
    let va = scene.body(a).unwrap().linear_velocity;
    let vb = scene.body(b).unwrap().linear_velocity;
    assert!((va.x - vb.x).abs().to_f64() < 1.0, "a {:?} b {:?}", va, vb);
    assert!(va.x.abs().to_f64() < 1.0);
}

#[test]
fn test_pair_pool_drop_keeps_lowest_keys() {
    let config = PhysicsConfig {
        pair_capacity: 8,
        overflow_policy: OverflowPolicy::Drop,
        ..PhysicsConfig::default()
    };
    let mut scene = random_scene(3, config);
    // pile everything into one spot
    let handles: Vec<BodyHandle> = scene.bodies().handles().collect();
    for handle in handles {
        let body = scene.body_mut(handle).unwrap();
        if body.is_dynamic() {
            body.position = FVec2::ZERO;
        }
    }

    // 60 dynamic bodies on one spot give 60 * 59 / 2 candidates
    scene.update(dt()).unwrap();
    assert_eq!(scene.active_pairs(), 8);
    assert_eq!(scene.dropped_pairs(), 1770 - 8);
    let keys: Vec<_> = scene.pairs().map(|pair| pair.key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_pair_pool_throw_is_fatal() {
    let config = PhysicsConfig {
        pair_capacity: 4,
        overflow_policy: OverflowPolicy::Throw,
        ..PhysicsConfig::default()
    };
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let mut scene = PhysicsScene::new(config, catalog).unwrap();
    for _ in 0..4 {
        scene.add_body(Body::new(FVec2::ZERO, circle));
    }
    match scene.update(dt()) {
        Err(PhysicsError::PairPoolExhausted { needed, available }) => {
            assert_eq!(needed, 6);
            assert_eq!(available, 4);
        }
        other => panic!("expected pool exhaustion, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_static_bodies_never_pair() {
    let mut catalog = ShapeCatalog::new();
    let square = catalog.add_box(FVec2::from_int(10, 10)).unwrap();
    let mut scene = PhysicsScene::new(PhysicsConfig::default(), catalog).unwrap();
    for x in 0..3 {
        scene.add_body(Body {
            mass: MassProps::STATIC,
            ..Body::new(FVec2::from_int(x * 5, 0), square)
        });
    }
    for _ in 0..3 {
        scene.update(dt()).unwrap();
        assert_eq!(scene.active_pairs(), 0);
    }
}

#[test]
fn test_resting_body_sleeps_and_wakes_on_contact() {
    let config = PhysicsConfig {
        sleep_ticks: 10,
        ..PhysicsConfig::default()
    };
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let mut scene = PhysicsScene::new(config, catalog).unwrap();
    let resting = scene.add_body(Body::new(FVec2::ZERO, circle));
    let moving = scene.add_body(Body {
        linear_velocity: FVec2::from_int(300, 0),
        ..Body::new(FVec2::from_int(-100, 0), circle)
    });

    let mut slept = false;
    let mut woke = false;
    for _ in 0..60 {
        scene.update(dt()).unwrap();
        if scene.is_sleeping(resting) {
            slept = true;
            assert_eq!(scene.body(resting).unwrap().linear_velocity, FVec2::ZERO);
        } else if slept {
            woke = true;
        }
    }
    assert!(slept);
    assert!(woke);
    // inelastic, so the incoming ball stops instead of bouncing back
    let velocity = scene.body(moving).unwrap().linear_velocity;
    assert!(velocity.x.to_f64().abs() < 1.0, "velocity {:?}", velocity);
}

#[test]
fn test_wake_then_push() {
    let config = PhysicsConfig {
        sleep_ticks: 5,
        ..PhysicsConfig::default()
    };
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let mut scene = PhysicsScene::new(config, catalog).unwrap();
    let ball = scene.add_body(Body::new(FVec2::ZERO, circle));
    for _ in 0..10 {
        scene.update(dt()).unwrap();
    }
    assert!(scene.is_sleeping(ball));

    // forces on sleepers are discarded
    scene.apply_force(ball, FVec2::from_int(600, 0)).unwrap();
    scene.update(dt()).unwrap();
    assert_eq!(scene.body(ball).unwrap().position, FVec2::ZERO);

    assert_eq!(scene.wake(ball).unwrap(), 1);
    scene.apply_force(ball, FVec2::from_int(600, 0)).unwrap();
    scene.update(dt()).unwrap();
    assert!(!scene.is_sleeping(ball));
    let velocity = scene.body(ball).unwrap().linear_velocity;
    assert!((velocity.x.to_f64() - 10.0).abs() < 1e-3, "velocity {:?}", velocity);
    assert!(velocity.y.is_zero());
}

#[test]
fn test_pushing_into_wall_stays_bounded() {
    let mut catalog = ShapeCatalog::new();
    let wall = catalog.add_box(FVec2::from_int(10, 100)).unwrap();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let mut scene = PhysicsScene::new(PhysicsConfig::default(), catalog).unwrap();
    scene.add_body(Body {
        mass: MassProps::STATIC,
        ..Body::new(FVec2::ZERO, wall)
    });
    let ball = scene.add_body(Body::new(FVec2::from_int(25, 0), circle));

    let push = |scene: &mut PhysicsScene, ticks: usize| {
        for _ in 0..ticks {
            scene.apply_force(ball, FVec2::from_int(-1000, 0)).unwrap();
            scene.update(dt()).unwrap();
        }
        scene.body(ball).unwrap().position.x
    };
    let settled = push(&mut scene, 200);
    let later = push(&mut scene, 200);
    assert!((later - settled).abs().to_f64() < 0.05, "drifted {} -> {}", settled, later);

    // the accumulated push against the wall converges
    let mut impulses = Vec::new();
    for _ in 0..100 {
        push(&mut scene, 1);
        impulses.push(scene.pairs().next().unwrap().normal_impulse.to_f64());
    }
    let lowest = impulses.iter().cloned().fold(f64::MAX, f64::min);
    let highest = impulses.iter().cloned().fold(f64::MIN, f64::max);
    assert!(lowest > 0.0, "impulse {}", lowest);
    assert!(highest - lowest < 1e-3, "impulse varied {} -> {}", lowest, highest);

    let body = scene.body(ball).unwrap();
    let x = body.position.x.to_f64();
    assert!(x > 18.0 && x < 20.5, "x {}", x);
    assert!(body.linear_velocity.length().to_f64() < 17.0);
    assert_eq!(scene.active_pairs(), 1);
}

#[test]
fn test_fast_body_keeps_its_speed() {
    let mut catalog = ShapeCatalog::new();
    let circle = catalog.add_circle(Fixed::from_int(10)).unwrap();
    let mut scene = PhysicsScene::new(PhysicsConfig::default(), catalog).unwrap();
    let ball = scene.add_body(Body {
        linear_velocity: FVec2::from_int(50_000, 0),
        ..Body::new(FVec2::ZERO, circle)
    });

    for _ in 0..3 {
        scene.update(dt()).unwrap();
        assert_eq!(scene.body(ball).unwrap().linear_velocity, FVec2::from_int(50_000, 0));
        assert_eq!(scene.motion(ball).unwrap().low_motion_ticks, 0);
    }
    assert!(!scene.is_sleeping(ball));
}
