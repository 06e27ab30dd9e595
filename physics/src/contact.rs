use crate::{
    body::BodyHandle,
    math::{FVec2, Fixed},
};
use std::collections::HashMap;

/// Result of an exact contact test. The normal points from body A to body B.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub normal: FVec2,
    pub penetration: Fixed,
    /// World space contact point.
    pub point: FVec2,
}

/// Order independent identity of a body pair, stored with `a < b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl PairKey {
    pub fn new(first: BodyHandle, second: BodyHandle) -> Self {
        if first <= second {
            Self {
                a: first,
                b: second,
            }
        } else {
            Self {
                a: second,
                b: first,
            }
        }
    }
}

impl Default for PairKey {
    fn default() -> Self {
        Self {
            a: BodyHandle::default(),
            b: BodyHandle::default(),
        }
    }
}

/// A pooled collision pair record.
///
/// Records are allocated once, bound to a body pair while its bounding boxes overlap and
/// returned to the pool with every field neutral afterwards. Accumulated impulses survive
/// between ticks only while the pair stays active and in contact.
#[derive(Copy, Clone, Debug, Default)]
pub struct CollisionPair {
    pub key: PairKey,
    pub active: bool,
    /// Zero or one, only single point contacts are generated.
    pub contact_count: u8,
    pub normal: FVec2,
    pub penetration: Fixed,
    /// Contact point relative to body A's position.
    pub local_point: FVec2,

    pub normal_impulse: Fixed,
    pub tangent_impulse: Fixed,

    // solver snapshots, written every tick by the warm start
    pub velocity_a: FVec2,
    pub velocity_b: FVec2,
    pub inv_mass_a: Fixed,
    pub inv_mass_b: Fixed,
    pub friction: Fixed,
    pub restitution: Fixed,
    /// Target separating speed from restitution.
    pub velocity_bias: Fixed,

    touched: bool,
}

impl CollisionPair {
    #[inline]
    pub fn has_contact(&self) -> bool {
        self.active && self.contact_count > 0
    }

    /// Ends contact and with it warm starting.
    pub fn clear_contact(&mut self) {
        self.contact_count = 0;
        self.normal = FVec2::ZERO;
        self.penetration = Fixed::ZERO;
        self.local_point = FVec2::ZERO;
        self.normal_impulse = Fixed::ZERO;
        self.tangent_impulse = Fixed::ZERO;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_neutral(&self) -> bool {
        self.contact_count == 0
            && self.normal == FVec2::ZERO
            && self.penetration.is_zero()
            && self.local_point == FVec2::ZERO
            && self.normal_impulse.is_zero()
            && self.tangent_impulse.is_zero()
            && self.velocity_a == FVec2::ZERO
            && self.velocity_b == FVec2::ZERO
            && self.inv_mass_a.is_zero()
            && self.inv_mass_b.is_zero()
            && self.friction.is_zero()
            && self.restitution.is_zero()
            && self.velocity_bias.is_zero()
    }
}

/// Fixed capacity arena of [`CollisionPair`] records.
///
/// Free slots are kept on a stack and the key lookup is a hash map that is never iterated, so
/// slot assignment only depends on the order of calls. Active slots are visited in canonical key
/// order.
#[derive(Debug)]
pub struct PairPool {
    pairs: Vec<CollisionPair>,
    free: Vec<u32>,
    lookup: HashMap<PairKey, u32>,
    active: Vec<u32>,
}

impl PairPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            pairs: vec![CollisionPair::default(); capacity],
            // lowest slot on top of the stack
            free: (0..capacity as u32).rev().collect(),
            lookup: HashMap::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.pairs.len()
    }

    pub fn active_count(&self) -> usize {
        self.lookup.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn find(&self, key: PairKey) -> Option<&CollisionPair> {
        self.lookup.get(&key).map(|&slot| &self.pairs[slot as usize])
    }

    /// Active slots in canonical key order.
    pub fn active_slots(&self) -> &[u32] {
        &self.active
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &CollisionPair> + '_ {
        self.active.iter().map(move |&slot| &self.pairs[slot as usize])
    }

    pub fn get(&self, slot: u32) -> &CollisionPair {
        &self.pairs[slot as usize]
    }

    pub fn get_mut(&mut self, slot: u32) -> &mut CollisionPair {
        &mut self.pairs[slot as usize]
    }

    /// Clears the touched mark on every active record.
    pub(crate) fn begin_mark(&mut self) {
        for &slot in &self.active {
            self.pairs[slot as usize].touched = false;
        }
    }

    /// Marks an existing record for `key` as still overlapping. Returns false if the key is not
    /// tracked.
    pub(crate) fn touch(&mut self, key: PairKey) -> bool {
        match self.lookup.get(&key) {
            Some(&slot) => {
                self.pairs[slot as usize].touched = true;
                true
            }
            None => false,
        }
    }

    /// Number of active records touched since [`PairPool::begin_mark`].
    pub(crate) fn touched_count(&self) -> usize {
        self.active
            .iter()
            .filter(|&&slot| self.pairs[slot as usize].touched)
            .count()
    }

    /// Returns every active record that was not touched this tick to the free list.
    pub(crate) fn reap_untouched(&mut self) -> usize {
        let mut reaped = 0;
        let pairs = &mut self.pairs;
        let lookup = &mut self.lookup;
        let free = &mut self.free;
        self.active.retain(|&slot| {
            let pair = &mut pairs[slot as usize];
            if pair.touched {
                true
            } else {
                lookup.remove(&pair.key);
                pair.reset();
                free.push(slot);
                reaped += 1;
                false
            }
        });
        reaped
    }

    /// Binds a free record to `key`. Returns `None` when the pool is exhausted.
    pub(crate) fn activate(&mut self, key: PairKey) -> Option<u32> {
        debug_assert!(!self.lookup.contains_key(&key));
        let slot = self.free.pop()?;
        let pair = &mut self.pairs[slot as usize];
        pair.reset();
        pair.key = key;
        pair.active = true;
        pair.touched = true;
        self.lookup.insert(key, slot);
        self.active.push(slot);
        Some(slot)
    }

    /// Restores canonical key order after activations.
    pub(crate) fn sort_active(&mut self) {
        let pairs = &self.pairs;
        self.active.sort_unstable_by_key(|&slot| pairs[slot as usize].key);
    }

    /// Forces every inactive record back to neutral. Returns how many needed fixing.
    pub fn cleanup_inactive(&mut self) -> usize {
        let mut fixed = 0;
        for pair in self.pairs.iter_mut().filter(|pair| !pair.active) {
            if !pair.is_neutral() || pair.key != PairKey::default() {
                pair.reset();
                fixed += 1;
            }
        }
        fixed
    }

    /// Deactivates everything, used when bodies are removed or the scene is reset.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        for pair in &mut self.pairs {
            pair.reset();
        }
        self.lookup.clear();
        self.active.clear();
        self.free.clear();
        self.free.extend((0..capacity as u32).rev());
    }

    /// Deactivates every record involving `handle`.
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.begin_mark();
        for &slot in &self.active {
            let pair = &mut self.pairs[slot as usize];
            pair.touched = pair.key.a != handle && pair.key.b != handle;
        }
        self.reap_untouched();
    }
}
