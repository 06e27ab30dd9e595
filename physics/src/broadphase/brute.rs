use super::BroadPhaseStrategy;
use crate::snapshot::BodyBounds;

/// Tests every pair of bounds. Quadratic, but useful as a reference for other strategies.
#[derive(Debug, Default)]
pub struct BruteForce {
    entries: Vec<BodyBounds>,
}

impl BruteForce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhaseStrategy for BruteForce {
    fn build(&mut self, bounds: &[BodyBounds]) {
        self.entries.clear();
        self.entries.extend_from_slice(bounds);
    }

    fn query_potential_collisions(&self, out: &mut Vec<(u32, u32)>) {
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[(i + 1)..] {
                if a.is_static && b.is_static {
                    continue;
                }
                if a.bounds.intersects(&b.bounds) {
                    out.push((a.index.min(b.index), a.index.max(b.index)));
                }
            }
        }
    }

    fn clear(&mut self) {
        self.entries = Vec::new();
    }
}
