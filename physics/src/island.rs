use crate::{
    body::{BodyArena, BodyHandle},
    contact::PairPool,
};

/// Weighted union-find over dense indices.
#[derive(Debug, Default)]
pub struct UnionFind {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl UnionFind {
    pub fn reset(&mut self, count: usize) {
        self.parent.clear();
        self.parent.extend(0..count as u32);
        self.size.clear();
        self.size.resize(count, 1);
    }

    /// Root of `x`, compressing the path on the way. Iterative so long chains cannot overflow the
    /// stack.
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = x;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        // attach the smaller tree below the larger
        let (small, large) = if self.size[root_a as usize] < self.size[root_b as usize] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small as usize] = large;
        self.size[large as usize] += self.size[small as usize];
    }
}

/// Labels every awake dynamic body with the connected component it forms through contacting
/// pairs. Labels are dense, numbered by first appearance in handle order, and rebuilt from
/// scratch every tick.
#[derive(Debug, Default)]
pub struct IslandBuilder {
    sets: UnionFind,
    members: Vec<BodyHandle>,
    dense_index: Vec<Option<u32>>,
    root_island: Vec<Option<u32>>,
}

impl IslandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of islands.
    pub fn build(&mut self, bodies: &mut BodyArena, pairs: &PairPool) -> u32 {
        self.members.clear();
        self.dense_index.clear();
        self.dense_index.resize(bodies.capacity(), None);
        for handle in bodies.handles() {
            if bodies.is_awake_dynamic(handle) {
                self.dense_index[handle.index()] = Some(self.members.len() as u32);
                self.members.push(handle);
            }
        }
        self.sets.reset(self.members.len());

        for pair in pairs.iter_active() {
            if !pair.has_contact() {
                continue;
            }
            let a = self.dense_index[pair.key.a.index()];
            let b = self.dense_index[pair.key.b.index()];
            if let (Some(a), Some(b)) = (a, b) {
                self.sets.union(a, b);
            }
        }

        let mut island_count = 0;
        self.root_island.clear();
        self.root_island.resize(self.members.len(), None);
        for handle in bodies.handles().collect::<Vec<_>>() {
            let island = match self.dense_index[handle.index()] {
                Some(index) => {
                    let root = self.sets.find(index) as usize;
                    let island = *self.root_island[root].get_or_insert_with(|| {
                        island_count += 1;
                        island_count - 1
                    });
                    Some(island)
                }
                None => None,
            };
            bodies.set_island(handle, island);
        }
        island_count
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        body::{Body, MassProps, SleepGroup},
        contact::PairKey,
        math::FVec2,
        shapes::{Collider, ShapeKind},
    };

    #[test]
    fn test_long_chain_does_not_recurse() {
        let count = 200_000;
        let mut sets = UnionFind::default();
        sets.reset(count);
        for i in 1..count as u32 {
            sets.union(i, i - 1);
        }
        let root = sets.find(count as u32 - 1);
        assert_eq!(sets.find(0), root);
        assert_eq!(sets.size[root as usize], count as u32);
    }

    #[test]
    fn test_islands() {
        let collider = Collider::new(ShapeKind::Circle, 0);
        let mut bodies = BodyArena::new();
        for i in 0..6 {
            bodies.add(Body::new(FVec2::from_int(i, 0), collider));
        }
        bodies.get_body_mut(BodyHandle(2)).mass = MassProps::STATIC;
        bodies.set_sleeping(BodyHandle(5), Some(SleepGroup(0)));

        let mut pairs = PairPool::new(8);
        for (a, b) in [(0, 3), (1, 2), (2, 4), (3, 5)].iter() {
            let slot = pairs
                .activate(PairKey::new(BodyHandle(*a), BodyHandle(*b)))
                .unwrap();
            pairs.get_mut(slot).contact_count = 1;
        }
        // overlapping bounds but no contact
        pairs.activate(PairKey::new(BodyHandle(0), BodyHandle(1)));
        pairs.sort_active();

        let mut islands = IslandBuilder::new();
        assert_eq!(islands.build(&mut bodies, &pairs), 3);

        let labels: Vec<_> = (0..6).map(|i| bodies.island(BodyHandle(i))).collect();
        // static bodies do not join islands, so 1 and 4 stay apart
        assert_eq!(labels, vec![Some(0), Some(1), None, Some(0), Some(2), None]);
    }
}
