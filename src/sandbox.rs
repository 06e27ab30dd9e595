use fixstep_physics::{
    Body, Collider, DampingField, FVec2, Fixed, MassProps, Material, PhysicsScene, Result,
    ShapeCatalog,
};
use rand::Rng;

pub const ARENA_HALF_WIDTH: i64 = 500;
pub const ARENA_HALF_HEIGHT: i64 = 300;
const WALL_HALF_THICKNESS: i64 = 10;

pub struct SandboxShapes {
    ground: Collider,
    side_wall: Collider,
    balls: Vec<Collider>,
    crate_box: Collider,
    wedge: Collider,
}

pub fn make_shapes(catalog: &mut ShapeCatalog) -> Result<SandboxShapes> {
    let ground = catalog.add_box(FVec2::from_int(ARENA_HALF_WIDTH, WALL_HALF_THICKNESS))?;
    let side_wall = catalog.add_box(FVec2::from_int(WALL_HALF_THICKNESS, ARENA_HALF_HEIGHT))?;
    let mut balls = Vec::new();
    for radius in [8, 12, 16].iter() {
        balls.push(catalog.add_circle(Fixed::from_int(*radius))?);
    }
    let crate_box = catalog.add_box(FVec2::from_int(12, 12))?;
    let wedge = catalog.add_polygon(&[
        FVec2::from_int(-15, -10),
        FVec2::from_int(15, -10),
        FVec2::from_int(0, 15),
    ])?;
    Ok(SandboxShapes {
        ground,
        side_wall,
        balls,
        crate_box,
        wedge,
    })
}

/// Static walls enclosing the arena.
pub fn add_standard_sandbox(scene: &mut PhysicsScene, shapes: &SandboxShapes) {
    let wall_material = Material::new(Fixed::HALF, Fixed::HALF, Fixed::ONE);
    let walls = [
        (FVec2::from_int(0, -ARENA_HALF_HEIGHT), shapes.ground),
        (FVec2::from_int(0, ARENA_HALF_HEIGHT), shapes.ground),
        (FVec2::from_int(-ARENA_HALF_WIDTH, 0), shapes.side_wall),
        (FVec2::from_int(ARENA_HALF_WIDTH, 0), shapes.side_wall),
    ];
    for &(position, collider) in walls.iter() {
        scene.add_body(Body {
            mass: MassProps::STATIC,
            material: wall_material,
            ..Body::new(position, collider)
        });
    }
}

/// Balls thrown in random directions from random spots inside the arena.
pub fn add_dynamic_balls<R: Rng>(
    scene: &mut PhysicsScene,
    shapes: &SandboxShapes,
    rng: &mut R,
    count: usize,
) -> Result<()> {
    let inner_x = ARENA_HALF_WIDTH - 50;
    let inner_y = ARENA_HALF_HEIGHT - 50;
    for _ in 0..count {
        let collider = shapes.balls[rng.gen_range(0..shapes.balls.len())];
        let position = FVec2::from_int(
            rng.gen_range(-inner_x..=inner_x),
            rng.gen_range(-inner_y..=inner_y),
        );
        scene.add_body(Body {
            linear_velocity: FVec2::from_int(rng.gen_range(-200..=200), rng.gen_range(-200..=200)),
            mass: MassProps::from_mass(Fixed::from_int(rng.gen_range(1..=4)))?,
            material: Material::new(
                Fixed::from_ratio(rng.gen_range(0..=8), 10),
                Fixed::from_ratio(rng.gen_range(2..=9), 10),
                Fixed::from_ratio(99, 100),
            ),
            ..Body::new(position, collider)
        });
    }
    Ok(())
}

/// A column of crates resting on the ground with a wedge on top.
pub fn add_box_stack(scene: &mut PhysicsScene, shapes: &SandboxShapes) {
    const STACK_HEIGHT: i64 = 5;
    let base = -ARENA_HALF_HEIGHT + WALL_HALF_THICKNESS + 12;
    for y in 0..STACK_HEIGHT {
        let offset = if y & 1 == 0 { 0 } else { 2 };
        scene.add_body(Body::new(
            FVec2::from_int(200 + offset, base + y * 25),
            shapes.crate_box,
        ));
    }
    scene.add_body(Body {
        rotation: Fixed::from_ratio(1, 10),
        ..Body::new(FVec2::from_int(200, base + STACK_HEIGHT * 25), shapes.wedge)
    });
}

/// A slow region in the middle of the arena.
pub fn add_mud(scene: &mut PhysicsScene) -> Result<usize> {
    scene.add_field(DampingField::new(
        FVec2::ZERO,
        Fixed::from_int(120),
        Fixed::from_ratio(9, 10),
    )?)
}
