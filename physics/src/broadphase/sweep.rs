use super::BroadPhaseStrategy;
use crate::{math::Fixed, snapshot::BodyBounds};

#[derive(Copy, Clone, Debug)]
struct PsuedoBody {
    index: u32,
    min_x: Fixed,
}

fn compare_min_x(a: &PsuedoBody, b: &PsuedoBody) -> std::cmp::Ordering {
    // ties broken by index so the order never depends on the input order
    a.min_x.cmp(&b.min_x).then(a.index.cmp(&b.index))
}

/// Sort and sweep along the x axis.
///
/// Bodies are sorted by the left edge of their bounds. Each body is then compared against the
/// following bodies until their left edge passes its right edge, with the y axis confirming the
/// overlap. Pairs of two static bodies are never reported.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    entries: Vec<BodyBounds>,
    sorted_bodies: Vec<PsuedoBody>,
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhaseStrategy for SweepAndPrune {
    fn build(&mut self, bounds: &[BodyBounds]) {
        self.entries.clear();
        self.entries.extend_from_slice(bounds);

        self.sorted_bodies.clear();
        self.sorted_bodies
            .extend(bounds.iter().map(|entry| PsuedoBody {
                index: entry.index,
                min_x: entry.bounds.mins.x,
            }));
        self.sorted_bodies.sort_unstable_by(compare_min_x);
    }

    fn query_potential_collisions(&self, out: &mut Vec<(u32, u32)>) {
        let entries = &self.entries;

        for i in 0..self.sorted_bodies.len() {
            let a = &entries[self.sorted_bodies[i].index as usize];

            for sorted_b in &self.sorted_bodies[(i + 1)..] {
                // past the right edge of a, nothing further along can overlap it
                if sorted_b.min_x > a.bounds.maxs.x {
                    break;
                }

                let b = &entries[sorted_b.index as usize];
                if a.is_static && b.is_static {
                    continue;
                }

                if a.bounds.mins.y <= b.bounds.maxs.y && b.bounds.mins.y <= a.bounds.maxs.y {
                    out.push((a.index.min(b.index), a.index.max(b.index)));
                }
            }
        }
    }

    fn clear(&mut self) {
        self.entries = Vec::new();
        self.sorted_bodies = Vec::new();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{bounds::Bounds, math::FVec2};

    fn entry(index: u32, x: i64, y: i64, is_static: bool) -> BodyBounds {
        BodyBounds {
            index,
            bounds: Bounds::from_centre_half_extents(FVec2::from_int(x, y), FVec2::from_int(10, 10)),
            is_static,
        }
    }

    #[test]
    fn test_sweep_pairs() {
        let bounds = [
            entry(0, 0, 0, false),
            entry(1, 15, 0, false),
            entry(2, 15, 50, false),
            entry(3, 100, 0, true),
            entry(4, 110, 0, true),
            entry(5, 95, 5, false),
        ];
        let mut sweep = SweepAndPrune::new();
        sweep.build(&bounds);
        let mut pairs = Vec::new();
        sweep.query_potential_collisions(&mut pairs);
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 1), (3, 5), (4, 5)]);
    }
}
