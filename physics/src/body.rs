use crate::{
    error::{PhysicsError, Result},
    material::Material,
    math::{FVec2, Fixed},
    shapes::Collider,
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl Default for BodyHandle {
    // default to invalid value
    fn default() -> Self {
        Self(u32::MAX)
    }
}

impl BodyHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inverse mass plus the static flag. Static bodies never move and have zero inverse mass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassProps {
    pub inv_mass: Fixed,
    pub is_static: bool,
}

impl MassProps {
    pub const STATIC: Self = Self {
        inv_mass: Fixed::ZERO,
        is_static: true,
    };

    pub fn dynamic(inv_mass: Fixed) -> Self {
        Self {
            inv_mass,
            is_static: false,
        }
    }

    /// Fails unless `mass` is positive.
    pub fn from_mass(mass: Fixed) -> Result<Self> {
        if !mass.is_positive() {
            return Err(PhysicsError::InvalidMass(mass));
        }
        Ok(Self::dynamic(Fixed::ONE / mass))
    }
}

impl Default for MassProps {
    fn default() -> Self {
        Self::dynamic(Fixed::ONE)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Body {
    pub position: FVec2,
    /// Position before the last integration step, for interpolating renderers.
    #[serde(default)]
    pub previous_position: FVec2,
    #[serde(default)]
    pub rotation: Fixed,
    #[serde(default)]
    pub linear_velocity: FVec2,
    #[serde(default)]
    pub angular_velocity: Fixed,
    #[serde(default)]
    pub mass: MassProps,
    pub collider: Collider,
    #[serde(default)]
    pub material: Material,
    /// External input consumed by the next integration step, then cleared.
    #[serde(default)]
    pub force: FVec2,
}

impl Body {
    pub fn new(position: FVec2, collider: Collider) -> Self {
        Self {
            position,
            previous_position: position,
            rotation: Fixed::ZERO,
            linear_velocity: FVec2::ZERO,
            angular_velocity: Fixed::ZERO,
            mass: MassProps::default(),
            collider,
            material: Material::default(),
            force: FVec2::ZERO,
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass.is_static
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.mass.is_static
    }

    pub fn apply_force(&mut self, force: FVec2) {
        if self.is_dynamic() {
            self.force += force;
        }
    }
}

/// Per-body motion summary maintained by the motion tracker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Motion {
    pub linear_speed: Fixed,
    pub angular_speed: Fixed,
    /// Consecutive ticks spent below both speed thresholds.
    pub low_motion_ticks: u32,
}

/// Identifies the island a body belonged to when it fell asleep. Fresh for every sleep event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SleepGroup(pub u64);

/// Body storage with stable, ascending-handle iteration.
///
/// Components live in parallel columns indexed by handle. Removed bodies leave a tombstone and
/// their handles are never reused.
#[derive(Debug, Default)]
pub struct BodyArena {
    bodies: Vec<Body>,
    alive: Vec<bool>,
    motion: Vec<Option<Motion>>,
    applied_damping: Vec<Option<Fixed>>,
    island: Vec<Option<u32>>,
    sleeping: Vec<Option<SleepGroup>>,
}

impl BodyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(body);
        self.alive.push(true);
        self.motion.push(None);
        self.applied_damping.push(None);
        self.island.push(None);
        self.sleeping.push(None);
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body> {
        if !self.contains(handle) {
            return Err(PhysicsError::InvalidBody(handle.0));
        }
        let index = handle.index();
        self.alive[index] = false;
        self.motion[index] = None;
        self.applied_damping[index] = None;
        self.island[index] = None;
        self.sleeping[index] = None;
        Ok(self.bodies[index].clone())
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.alive.get(handle.index()).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.alive.clear();
        self.motion.clear();
        self.applied_damping.clear();
        self.island.clear();
        self.sleeping.clear();
    }

    /// Number of slots, including tombstones.
    pub fn capacity(&self) -> usize {
        self.bodies.len()
    }

    pub fn len(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles in ascending order.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| BodyHandle(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies
            .iter()
            .zip(self.alive.iter())
            .enumerate()
            .filter(|(_, (_, alive))| **alive)
            .map(|(i, (body, _))| (BodyHandle(i as u32), body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> + '_ {
        self.bodies
            .iter_mut()
            .zip(self.alive.iter())
            .enumerate()
            .filter(|(_, (_, alive))| **alive)
            .map(|(i, (body, _))| (BodyHandle(i as u32), body))
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        if self.contains(handle) {
            Some(&self.bodies[handle.index()])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        if self.contains(handle) {
            Some(&mut self.bodies[handle.index()])
        } else {
            None
        }
    }

    /// Panics on an invalid handle. Pipeline stages only use handles they got from the arena.
    pub fn get_body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.index()]
    }

    pub fn get_body_mut(&mut self, handle: BodyHandle) -> &mut Body {
        &mut self.bodies[handle.index()]
    }

    pub fn is_sleeping(&self, handle: BodyHandle) -> bool {
        self.sleeping
            .get(handle.index())
            .map_or(false, |s| s.is_some())
    }

    pub fn sleep_group(&self, handle: BodyHandle) -> Option<SleepGroup> {
        self.sleeping.get(handle.index()).copied().flatten()
    }

    pub fn set_sleeping(&mut self, handle: BodyHandle, group: Option<SleepGroup>) {
        self.sleeping[handle.index()] = group;
    }

    /// Dynamic, live and not sleeping.
    pub fn is_awake_dynamic(&self, handle: BodyHandle) -> bool {
        self.contains(handle) && self.get_body(handle).is_dynamic() && !self.is_sleeping(handle)
    }

    /// The inverse mass the solver sees: zero for static and sleeping bodies.
    pub fn effective_inv_mass(&self, handle: BodyHandle) -> Fixed {
        if self.is_awake_dynamic(handle) {
            self.get_body(handle).mass.inv_mass
        } else {
            Fixed::ZERO
        }
    }

    pub fn motion(&self, handle: BodyHandle) -> Option<&Motion> {
        self.motion.get(handle.index()).and_then(Option::as_ref)
    }

    pub fn motion_mut(&mut self, handle: BodyHandle) -> &mut Option<Motion> {
        &mut self.motion[handle.index()]
    }

    pub fn applied_damping(&self, handle: BodyHandle) -> Option<Fixed> {
        self.applied_damping.get(handle.index()).copied().flatten()
    }

    pub fn applied_damping_mut(&mut self, handle: BodyHandle) -> &mut Option<Fixed> {
        &mut self.applied_damping[handle.index()]
    }

    pub fn island(&self, handle: BodyHandle) -> Option<u32> {
        self.island.get(handle.index()).copied().flatten()
    }

    pub fn set_island(&mut self, handle: BodyHandle, island: Option<u32>) {
        self.island[handle.index()] = island;
    }

    pub fn print_bodies(&self, step_num: u64) {
        for (handle, body) in self.iter() {
            if body.is_dynamic() {
                println!(
                    "step: {} index: {} pos: ({}, {}) rot: {} lin: ({}, {}) ang: {} sleeping: {}",
                    step_num,
                    handle.0,
                    body.position.x,
                    body.position.y,
                    body.rotation,
                    body.linear_velocity.x,
                    body.linear_velocity.y,
                    body.angular_velocity,
                    self.is_sleeping(handle),
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::{Collider, ShapeKind};

    fn body_at(x: i64) -> Body {
        Body::new(FVec2::from_int(x, 0), Collider::new(ShapeKind::Circle, 0))
    }

    #[test]
    fn test_arena_handles_are_stable() {
        let mut bodies = BodyArena::new();
        let a = bodies.add(body_at(0));
        let b = bodies.add(body_at(1));
        let c = bodies.add(body_at(2));

        bodies.remove(b).unwrap();
        assert!(bodies.remove(b).is_err());
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies.handles().collect::<Vec<_>>(), vec![a, c]);

        let d = bodies.add(body_at(3));
        assert_eq!(d, BodyHandle(3));
        assert!(bodies.get(b).is_none());
    }

    #[test]
    fn test_from_mass() {
        assert_eq!(
            MassProps::from_mass(Fixed::from_int(4)).unwrap(),
            MassProps::dynamic(Fixed::from_ratio(1, 4))
        );
        assert!(matches!(
            MassProps::from_mass(Fixed::ZERO),
            Err(PhysicsError::InvalidMass(_))
        ));
        assert!(MassProps::from_mass(Fixed::from_int(-2)).is_err());
    }

    #[test]
    fn test_effective_inv_mass() {
        let mut bodies = BodyArena::new();
        let a = bodies.add(body_at(0));
        let mut wall = body_at(10);
        wall.mass = MassProps::STATIC;
        let w = bodies.add(wall);

        assert_eq!(bodies.effective_inv_mass(a), Fixed::ONE);
        assert_eq!(bodies.effective_inv_mass(w), Fixed::ZERO);

        bodies.set_sleeping(a, Some(SleepGroup(0)));
        assert!(bodies.is_sleeping(a));
        assert_eq!(bodies.effective_inv_mass(a), Fixed::ZERO);
    }
}
