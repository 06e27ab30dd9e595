mod sandbox;
mod time_accumulator;

use fixstep_physics::{FVec2, PhysicsConfig, PhysicsScene, Result, ShapeCatalog};
use glam::Vec2;
use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::{fmt::Display, str::FromStr, time::Duration};
use time_accumulator::TimeAccumulator;

const UPDATE_HZ: u32 = 60;

struct Args {
    steps: u64,
    seed: u64,
    balls: usize,
    config: Option<String>,
}

/// Parses `value` for `flag`, keeping `current` when it is malformed.
fn parse_value<T: FromStr + Display>(flag: &str, value: &str, current: T) -> T {
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("ignoring malformed {} value {:?}, using {}", flag, value, current);
            current
        }
    }
}

fn parse_args<I: Iterator<Item = String>>(mut iter: I) -> Args {
    let mut args = Args {
        steps: 600,
        seed: 1,
        balls: 40,
        config: None,
    };
    while let Some(arg) = iter.next() {
        let value = iter.next();
        match (arg.as_str(), value) {
            ("--steps", Some(value)) => args.steps = parse_value(&arg, &value, args.steps),
            ("--seed", Some(value)) => args.seed = parse_value(&arg, &value, args.seed),
            ("--balls", Some(value)) => args.balls = parse_value(&arg, &value, args.balls),
            ("--config", Some(value)) => args.config = Some(value),
            (arg, _) => eprintln!("ignoring argument {}", arg),
        }
    }
    args
}

fn run(args: &Args) -> Result<u64> {
    let config = match &args.config {
        Some(path) => PhysicsConfig::load(path)?,
        None => PhysicsConfig::default(),
    };

    let mut catalog = ShapeCatalog::new();
    let shapes = sandbox::make_shapes(&mut catalog)?;
    let mut scene = PhysicsScene::new(config, catalog)?;

    let mut rng = Pcg32::seed_from_u64(args.seed);
    sandbox::add_standard_sandbox(&mut scene, &shapes);
    sandbox::add_dynamic_balls(&mut scene, &shapes, &mut rng, args.balls)?;
    sandbox::add_box_stack(&mut scene, &shapes);
    sandbox::add_mud(&mut scene)?;

    // frame times jitter, the physics step does not
    let mut accum = TimeAccumulator::new(UPDATE_HZ);
    let handles: Vec<_> = scene.bodies().handles().collect();
    while scene.step_num() < args.steps {
        accum.update(Duration::from_micros(rng.gen_range(15_000..18_500)));
        for _ in 0..accum.num_steps() {
            if scene.step_num() % 240 == 239 {
                let handle = handles[rng.gen_range(0..handles.len())];
                let woke = scene.wake(handle)?;
                scene.apply_force(handle, FVec2::from_int(0, 20_000))?;
                info!("kicked body {} ({} woke)", handle.0, woke);
            }
            scene.update(accum.step())?;
            if scene.step_num() % 60 == 0 {
                info!(
                    "step {} hash {:016x} pairs {} dropped {} islands {}",
                    scene.step_num(),
                    scene.state_hash(),
                    scene.active_pairs(),
                    scene.dropped_pairs(),
                    scene.island_count(),
                );
            }
        }
    }

    scene.bodies().print_bodies(scene.step_num());

    let (sum, count) = scene
        .bodies()
        .iter()
        .filter(|(_, body)| body.is_dynamic())
        .fold((Vec2::ZERO, 0), |(sum, count), (_, body)| {
            (sum + body.position.to_vec2(), count + 1)
        });
    if count > 0 {
        info!("centre of dynamic bodies {}", sum / count as f32);
    }
    Ok(scene.state_hash())
}

fn main() {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1));
    match run(&args) {
        Ok(hash) => println!("{:016x}", hash),
        Err(err) => {
            error!("simulation failed: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        parse_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["--steps", "120", "--seed", "9", "--config", "world.json"]);
        assert_eq!(args.steps, 120);
        assert_eq!(args.seed, 9);
        assert_eq!(args.balls, 40);
        assert_eq!(args.config.as_deref(), Some("world.json"));
    }

    #[test]
    fn test_malformed_values_keep_defaults() {
        let args = parse(&["--steps", "lots", "--balls", "-3", "--seed", "7"]);
        assert_eq!(args.steps, 600);
        assert_eq!(args.balls, 40);
        assert_eq!(args.seed, 7);
    }
}
