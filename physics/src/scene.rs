use crate::{
    body::{Body, BodyArena, BodyHandle, Motion},
    broadphase::{BroadPhaseStrategy, BroadPhaseTracker},
    config::{OverflowPolicy, PhysicsConfig},
    contact::CollisionPair,
    correction::correct_positions,
    damping::{update_field_damping, DampingField},
    error::{PhysicsError, Result},
    integrate::{integrate_bodies, SnapThresholds},
    intersect::{ContactTest, ShapeContactTest},
    island::IslandBuilder,
    material::{MaterialCombiner, MultiplyCombiner},
    math::{FVec2, Fixed},
    motion::track_motion,
    narrowphase::update_contacts,
    shapes::ShapeCatalog,
    sleep::SleepScheduler,
    snapshot::WorldSnapshot,
    solver::{apply_impulses, ContactSolver},
};
use log::{debug, warn};

/// A deterministic 2D rigid body world.
///
/// [`PhysicsScene::update`] runs one fixed tick: bounds snapshot, broad phase, narrow phase,
/// contact solve, impulse commit, field damping, integration, position correction, motion
/// tracking, islands, sleep and pair cleanup, always in that order.
pub struct PhysicsScene {
    config: PhysicsConfig,
    bodies: BodyArena,
    catalog: ShapeCatalog,
    fields: Vec<DampingField>,
    snapshot: WorldSnapshot,
    broad_phase: BroadPhaseTracker,
    contact_test: Box<dyn ContactTest>,
    combiner: Box<dyn MaterialCombiner>,
    islands: IslandBuilder,
    sleep: SleepScheduler,
    island_count: u32,
    fixed_dt: Option<Fixed>,
    step_num: u64,
}

impl PhysicsScene {
    pub fn new(config: PhysicsConfig, catalog: ShapeCatalog) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self {
            broad_phase: BroadPhaseTracker::new(config.pair_capacity, config.overflow_policy),
            config,
            bodies: BodyArena::new(),
            catalog,
            fields: Vec::new(),
            snapshot: WorldSnapshot::new(),
            contact_test: Box::new(ShapeContactTest),
            combiner: Box::new(MultiplyCombiner),
            islands: IslandBuilder::new(),
            sleep: SleepScheduler::new(),
            island_count: 0,
            fixed_dt: None,
            step_num: 0,
        })
    }

    /// Removes every body and field and rewinds the step counter. Shapes and strategies stay.
    pub fn reset(&mut self) {
        self.step_num = 0;
        self.fixed_dt = None;
        self.island_count = 0;
        self.bodies.clear();
        self.fields.clear();
        self.broad_phase.pairs_mut().clear();
        self.sleep = SleepScheduler::new();
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn shapes(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn bodies(&self) -> &BodyArena {
        &self.bodies
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.bodies.add(body)
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.bodies.remove(handle)?;
        self.broad_phase.pairs_mut().remove_body(handle);
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Accumulates a force for the next tick only. Forces on sleeping bodies are discarded, wake
    /// the body first.
    pub fn apply_force(&mut self, handle: BodyHandle, force: FVec2) -> Result<()> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidBody(handle.0))?
            .apply_force(force);
        Ok(())
    }

    /// Wakes the body together with everything that fell asleep with it.
    pub fn wake(&mut self, handle: BodyHandle) -> Result<usize> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::InvalidBody(handle.0));
        }
        Ok(self.sleep.wake_group(&mut self.bodies, handle))
    }

    pub fn is_sleeping(&self, handle: BodyHandle) -> bool {
        self.bodies.is_sleeping(handle)
    }

    /// Island label from the last tick. Not stable across ticks.
    pub fn island(&self, handle: BodyHandle) -> Option<u32> {
        self.bodies.island(handle)
    }

    pub fn island_count(&self) -> u32 {
        self.island_count
    }

    pub fn motion(&self, handle: BodyHandle) -> Option<&Motion> {
        self.bodies.motion(handle)
    }

    pub fn add_field(&mut self, field: DampingField) -> Result<usize> {
        field.validate()?;
        self.fields.push(field);
        Ok(self.fields.len() - 1)
    }

    pub fn fields(&self) -> &[DampingField] {
        &self.fields
    }

    /// Fields are semi-static, they may be moved or retuned between ticks.
    pub fn field_mut(&mut self, index: usize) -> Result<&mut DampingField> {
        self.fields
            .get_mut(index)
            .ok_or(PhysicsError::InvalidField(index))
    }

    pub fn set_broad_phase_strategy(&mut self, strategy: Box<dyn BroadPhaseStrategy>) {
        self.broad_phase.set_strategy(strategy);
    }

    pub fn set_contact_test(&mut self, contact_test: Box<dyn ContactTest>) {
        self.contact_test = contact_test;
    }

    pub fn set_material_combiner(&mut self, combiner: Box<dyn MaterialCombiner>) {
        self.combiner = combiner;
    }

    pub fn set_overflow_policy(&mut self, overflow_policy: OverflowPolicy) {
        self.config.overflow_policy = overflow_policy;
        self.broad_phase.set_overflow_policy(overflow_policy);
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.broad_phase.overflow_policy()
    }

    /// Pairs the broad phase could not track during the last tick.
    pub fn dropped_pairs(&self) -> usize {
        self.broad_phase.dropped_pairs()
    }

    pub fn active_pairs(&self) -> usize {
        self.broad_phase.pairs().active_count()
    }

    /// Active pair records in canonical key order.
    pub fn pairs(&self) -> impl Iterator<Item = &CollisionPair> + '_ {
        self.broad_phase.pairs().iter_active()
    }

    pub fn step_num(&self) -> u64 {
        self.step_num
    }

    /// Advances the world by one fixed tick.
    ///
    /// `dt` must stay the same for the whole session for runs to be reproducible. Errors are fatal
    /// for the session, the world is left part way through the tick.
    pub fn update(&mut self, dt: Fixed) -> Result<()> {
        match self.fixed_dt {
            Some(fixed_dt) if fixed_dt != dt => {
                warn!("time step changed from {} to {}, determinism is lost", fixed_dt, dt);
                self.fixed_dt = Some(dt);
            }
            None => self.fixed_dt = Some(dt),
            _ => {}
        }
        self.step_num += 1;

        self.snapshot.build(&self.bodies, &self.catalog)?;

        self.broad_phase.update(&self.snapshot, &self.bodies)?;

        let num_contacts = update_contacts(
            self.broad_phase.pairs_mut(),
            &self.bodies,
            &self.catalog,
            self.contact_test.as_ref(),
        )?;

        let solver = ContactSolver {
            iterations: self.config.solver_iterations,
            restitution_threshold: self.config.restitution_threshold,
        };
        solver.solve(
            self.broad_phase.pairs_mut(),
            &self.bodies,
            self.combiner.as_ref(),
        );

        apply_impulses(self.broad_phase.pairs(), &mut self.bodies);

        update_field_damping(&mut self.bodies, &self.fields);

        integrate_bodies(
            &mut self.bodies,
            dt,
            SnapThresholds {
                linear: self.config.linear_snap_threshold,
                angular: self.config.angular_snap_threshold,
            },
        );

        correct_positions(
            self.broad_phase.pairs(),
            &mut self.bodies,
            self.config.penetration_slop,
            self.config.correction_percentage,
        );

        track_motion(
            &mut self.bodies,
            self.config.linear_sleep_threshold,
            self.config.angular_sleep_threshold,
        );

        self.island_count = self
            .islands
            .build(&mut self.bodies, self.broad_phase.pairs());

        self.sleep
            .update(&mut self.bodies, self.broad_phase.pairs(), self.config.sleep_ticks);

        let fixed = self.broad_phase.pairs_mut().cleanup_inactive();
        if fixed > 0 {
            debug!("reset {} inactive pair records", fixed);
        }

        debug!(
            "step {}: {} bodies, {} pairs, {} contacts, {} islands",
            self.step_num,
            self.bodies.len(),
            self.active_pairs(),
            num_contacts,
            self.island_count
        );

        Ok(())
    }

    /// FNV-1a over the raw bits of every body's position, rotation and velocities.
    ///
    /// Two runs from the same state with the same time steps produce the same hash.
    pub fn state_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        let mut write = |value: i64| {
            for byte in value.to_le_bytes().iter() {
                hash ^= *byte as u64;
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        };
        for (handle, body) in self.bodies.iter() {
            write(handle.0 as i64);
            write(body.position.x.to_raw());
            write(body.position.y.to_raw());
            write(body.rotation.to_raw());
            write(body.linear_velocity.x.to_raw());
            write(body.linear_velocity.y.to_raw());
            write(body.angular_velocity.to_raw());
        }
        hash
    }
}
