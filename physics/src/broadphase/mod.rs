mod brute;
mod sweep;

use crate::{
    body::BodyArena,
    config::OverflowPolicy,
    contact::{PairKey, PairPool},
    error::{PhysicsError, Result},
    snapshot::{BodyBounds, WorldSnapshot},
};
use log::{trace, warn};

pub use brute::BruteForce;
pub use sweep::SweepAndPrune;

/// Spatial partitioning used to shortlist overlapping bounds.
///
/// Pairs are reported as snapshot indices. The order they are reported in does not matter, but
/// the set of pairs must only depend on the bounds.
pub trait BroadPhaseStrategy {
    /// Rebuilds the spatial index from this tick's bounds.
    fn build(&mut self, bounds: &[BodyBounds]);

    /// Appends every candidate pair of overlapping bounds to `out`.
    fn query_potential_collisions(&self, out: &mut Vec<(u32, u32)>);

    /// Releases the spatial index. Called before the strategy is replaced.
    fn clear(&mut self) {}
}

/// Tracks which body pairs have overlapping bounds, backed by a fixed size [`PairPool`].
///
/// Every update marks the records whose pair still overlaps, reaps the rest and only then binds
/// free records to newly overlapping pairs.
pub struct BroadPhaseTracker {
    strategy: Box<dyn BroadPhaseStrategy>,
    pool: PairPool,
    overflow_policy: OverflowPolicy,
    dropped_pairs: usize,
    candidates: Vec<(u32, u32)>,
    keys: Vec<PairKey>,
    new_keys: Vec<PairKey>,
}

impl BroadPhaseTracker {
    pub fn new(capacity: usize, overflow_policy: OverflowPolicy) -> Self {
        Self {
            strategy: Box::new(SweepAndPrune::new()),
            pool: PairPool::new(capacity),
            overflow_policy,
            dropped_pairs: 0,
            candidates: Vec::new(),
            keys: Vec::new(),
            new_keys: Vec::new(),
        }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn BroadPhaseStrategy>) {
        self.strategy.clear();
        self.strategy = strategy;
    }

    pub fn set_overflow_policy(&mut self, overflow_policy: OverflowPolicy) {
        self.overflow_policy = overflow_policy;
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    /// Pairs skipped during the last update because the pool was full.
    pub fn dropped_pairs(&self) -> usize {
        self.dropped_pairs
    }

    pub fn pairs(&self) -> &PairPool {
        &self.pool
    }

    pub fn pairs_mut(&mut self) -> &mut PairPool {
        &mut self.pool
    }

    pub fn update(&mut self, snapshot: &WorldSnapshot, bodies: &BodyArena) -> Result<()> {
        self.dropped_pairs = 0;

        self.strategy.build(snapshot.entries());
        self.candidates.clear();
        self.strategy
            .query_potential_collisions(&mut self.candidates);

        // resolve candidates to canonical keys, skipping pairs that cannot move
        self.keys.clear();
        for &(index_a, index_b) in &self.candidates {
            let handle_a = snapshot.handle(index_a);
            let handle_b = snapshot.handle(index_b);
            if handle_a == handle_b {
                continue;
            }
            if !bodies.is_awake_dynamic(handle_a) && !bodies.is_awake_dynamic(handle_b) {
                continue;
            }
            self.keys.push(PairKey::new(handle_a, handle_b));
        }
        self.keys.sort_unstable();
        self.keys.dedup();

        // mark
        self.pool.begin_mark();
        self.new_keys.clear();
        for &key in &self.keys {
            if !self.pool.touch(key) {
                self.new_keys.push(key);
            }
        }

        let available = self.pool.capacity() - self.pool.touched_count();
        if self.new_keys.len() > available {
            match self.overflow_policy {
                OverflowPolicy::Throw => {
                    return Err(PhysicsError::PairPoolExhausted {
                        needed: self.pool.touched_count() + self.new_keys.len(),
                        available: self.pool.capacity(),
                    });
                }
                OverflowPolicy::Drop => {
                    self.dropped_pairs = self.new_keys.len() - available;
                    self.new_keys.truncate(available);
                    warn!(
                        "pair pool of {} exhausted, dropped {} pairs",
                        self.pool.capacity(),
                        self.dropped_pairs
                    );
                }
            }
        }

        // reap
        let reaped = self.pool.reap_untouched();

        // allocate
        for &key in &self.new_keys {
            // cannot fail, the shortfall was handled above
            if self.pool.activate(key).is_none() {
                self.dropped_pairs += 1;
            }
        }
        self.pool.sort_active();

        trace!(
            "broad phase: {} candidates, {} new, {} reaped, {} active",
            self.candidates.len(),
            self.new_keys.len(),
            reaped,
            self.pool.active_count()
        );

        Ok(())
    }
}
