use crate::{
    body::{BodyArena, BodyHandle, SleepGroup},
    contact::PairPool,
    math::{FVec2, Fixed},
};
use log::debug;
use std::collections::BTreeSet;

/// Puts quiescent islands to sleep and wakes sleeping groups that an awake body touches.
#[derive(Debug, Default)]
pub struct SleepScheduler {
    next_group: u64,
    // per island, whether every member is quiet
    islands: Vec<bool>,
    wake: BTreeSet<SleepGroup>,
}

/// Bodies that changed state during one [`SleepScheduler::update`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SleepStats {
    pub fell_asleep: usize,
    pub woke_up: usize,
}

impl SleepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs after the islands were built this tick. An island sleeps once every member has been
    /// quiet for `sleep_ticks` consecutive ticks. Waking takes effect in the same tick the
    /// contact is seen.
    pub fn update(
        &mut self,
        bodies: &mut BodyArena,
        pairs: &PairPool,
        sleep_ticks: u32,
    ) -> SleepStats {
        let mut stats = SleepStats::default();
        let handles: Vec<_> = bodies.handles().collect();

        self.islands.clear();
        for &handle in &handles {
            let island = match bodies.island(handle) {
                Some(island) if bodies.is_awake_dynamic(handle) => island as usize,
                _ => continue,
            };
            if island >= self.islands.len() {
                self.islands.resize(island + 1, true);
            }
            let quiet = bodies
                .motion(handle)
                .map_or(false, |motion| motion.low_motion_ticks >= sleep_ticks);
            self.islands[island] &= quiet;
        }

        let first_group = self.next_group;
        self.next_group += self.islands.len() as u64;
        for &handle in &handles {
            let island = match bodies.island(handle) {
                Some(island) if bodies.is_awake_dynamic(handle) => island as usize,
                _ => continue,
            };
            if self.islands[island] {
                let group = SleepGroup(first_group + island as u64);
                put_to_sleep(bodies, handle, group);
                stats.fell_asleep += 1;
            }
        }

        // a sleeping body touched by an awake dynamic body wakes its whole group
        self.wake.clear();
        for pair in pairs.iter_active() {
            if !pair.has_contact() {
                continue;
            }
            let (a, b) = (pair.key.a, pair.key.b);
            let group_a = bodies.sleep_group(a);
            let group_b = bodies.sleep_group(b);
            match (group_a, group_b) {
                (Some(group), None) if bodies.is_awake_dynamic(b) => {
                    self.wake.insert(group);
                }
                (None, Some(group)) if bodies.is_awake_dynamic(a) => {
                    self.wake.insert(group);
                }
                _ => {}
            }
        }

        if !self.wake.is_empty() {
            for &handle in &handles {
                if let Some(group) = bodies.sleep_group(handle) {
                    if self.wake.contains(&group) {
                        wake_body(bodies, handle);
                        stats.woke_up += 1;
                    }
                }
            }
        }

        if stats.fell_asleep > 0 || stats.woke_up > 0 {
            debug!(
                "{} bodies fell asleep, {} woke up",
                stats.fell_asleep, stats.woke_up
            );
        }
        stats
    }

    /// Wakes every body sharing a sleep group with `handle`. Returns how many woke.
    pub fn wake_group(&self, bodies: &mut BodyArena, handle: BodyHandle) -> usize {
        let group = match bodies.sleep_group(handle) {
            Some(group) => group,
            None => return 0,
        };
        let members: Vec<_> = bodies
            .handles()
            .filter(|&h| bodies.sleep_group(h) == Some(group))
            .collect();
        for &member in &members {
            wake_body(bodies, member);
        }
        debug!("woke sleep group {} ({} bodies)", group.0, members.len());
        members.len()
    }
}

fn put_to_sleep(bodies: &mut BodyArena, handle: BodyHandle, group: SleepGroup) {
    bodies.set_sleeping(handle, Some(group));
    let body = bodies.get_body_mut(handle);
    body.linear_velocity = FVec2::ZERO;
    body.angular_velocity = Fixed::ZERO;
}

fn wake_body(bodies: &mut BodyArena, handle: BodyHandle) {
    bodies.set_sleeping(handle, None);
    if let Some(motion) = bodies.motion_mut(handle) {
        motion.low_motion_ticks = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        body::{Body, Motion},
        contact::PairKey,
        island::IslandBuilder,
        shapes::{Collider, ShapeKind},
    };

    fn quiet_bodies(count: i64, ticks: u32) -> BodyArena {
        let collider = Collider::new(ShapeKind::Circle, 0);
        let mut bodies = BodyArena::new();
        for i in 0..count {
            let handle = bodies.add(Body::new(FVec2::from_int(i, 0), collider));
            *bodies.motion_mut(handle) = Some(Motion {
                low_motion_ticks: ticks,
                ..Motion::default()
            });
        }
        bodies
    }

    fn touching(pairs: &mut PairPool, a: u32, b: u32) {
        let slot = pairs
            .activate(PairKey::new(BodyHandle(a), BodyHandle(b)))
            .unwrap();
        pairs.get_mut(slot).contact_count = 1;
        pairs.sort_active();
    }

    #[test]
    fn test_island_sleeps_as_a_whole() {
        let mut bodies = quiet_bodies(3, 60);
        bodies.motion_mut(BodyHandle(2)).as_mut().unwrap().low_motion_ticks = 59;
        let mut pairs = PairPool::new(4);
        touching(&mut pairs, 1, 2);

        let mut islands = IslandBuilder::new();
        let mut scheduler = SleepScheduler::new();
        islands.build(&mut bodies, &pairs);
        let stats = scheduler.update(&mut bodies, &pairs, 60);

        // body 0 is alone and quiet, 1 must wait for 2
        assert_eq!(stats.fell_asleep, 1);
        assert!(bodies.is_sleeping(BodyHandle(0)));
        assert!(!bodies.is_sleeping(BodyHandle(1)));
        assert!(!bodies.is_sleeping(BodyHandle(2)));

        bodies.motion_mut(BodyHandle(2)).as_mut().unwrap().low_motion_ticks = 60;
        islands.build(&mut bodies, &pairs);
        scheduler.update(&mut bodies, &pairs, 60);
        assert!(bodies.is_sleeping(BodyHandle(1)));
        assert_eq!(
            bodies.sleep_group(BodyHandle(1)),
            bodies.sleep_group(BodyHandle(2))
        );
        assert_ne!(
            bodies.sleep_group(BodyHandle(0)),
            bodies.sleep_group(BodyHandle(1))
        );
    }

    #[test]
    fn test_touching_sleeper_wakes_group_same_tick() {
        let mut bodies = quiet_bodies(4, 60);
        let mut pairs = PairPool::new(4);
        touching(&mut pairs, 0, 1);

        let mut islands = IslandBuilder::new();
        let mut scheduler = SleepScheduler::new();
        islands.build(&mut bodies, &pairs);
        scheduler.update(&mut bodies, &pairs, 60);
        assert!(bodies.is_sleeping(BodyHandle(0)));
        assert!(bodies.is_sleeping(BodyHandle(1)));

        // a moving body 3 now touches body 1
        bodies.motion_mut(BodyHandle(3)).as_mut().unwrap().low_motion_ticks = 0;
        bodies.set_sleeping(BodyHandle(3), None);
        touching(&mut pairs, 1, 3);
        islands.build(&mut bodies, &pairs);
        let stats = scheduler.update(&mut bodies, &pairs, 60);

        assert_eq!(stats.woke_up, 2);
        assert!(!bodies.is_sleeping(BodyHandle(0)));
        assert!(!bodies.is_sleeping(BodyHandle(1)));
        assert_eq!(bodies.motion(BodyHandle(0)).unwrap().low_motion_ticks, 0);
        // body 2 slept alone and nothing touched it
        assert!(bodies.is_sleeping(BodyHandle(2)));
    }

    #[test]
    fn test_wake_group() {
        let mut bodies = quiet_bodies(3, 60);
        let mut pairs = PairPool::new(4);
        touching(&mut pairs, 0, 1);
        let mut islands = IslandBuilder::new();
        let mut scheduler = SleepScheduler::new();
        islands.build(&mut bodies, &pairs);
        scheduler.update(&mut bodies, &pairs, 60);

        assert_eq!(scheduler.wake_group(&mut bodies, BodyHandle(1)), 2);
        assert!(!bodies.is_sleeping(BodyHandle(0)));
        assert!(bodies.is_sleeping(BodyHandle(2)));
        assert_eq!(scheduler.wake_group(&mut bodies, BodyHandle(0)), 0);
    }
}
