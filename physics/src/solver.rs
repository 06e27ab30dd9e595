use crate::{
    body::BodyArena,
    contact::{CollisionPair, PairPool},
    material::MaterialCombiner,
    math::{FVec2, Fixed},
};

/// Sequential impulse contact solver.
///
/// Every pair works on its own snapshot of the two body velocities, body state is only touched
/// afterwards by [`apply_impulses`].
#[derive(Copy, Clone, Debug)]
pub struct ContactSolver {
    pub iterations: u32,
    /// Closing speed below which restitution is ignored.
    pub restitution_threshold: Fixed,
}

impl ContactSolver {
    pub fn solve(
        &self,
        pairs: &mut PairPool,
        bodies: &BodyArena,
        combiner: &dyn MaterialCombiner,
    ) {
        for i in 0..pairs.active_slots().len() {
            let slot = pairs.active_slots()[i];
            let pair = pairs.get_mut(slot);
            if pair.has_contact() {
                self.pre_solve(pair, bodies, combiner);
            }
        }

        for _ in 0..self.iterations {
            for i in 0..pairs.active_slots().len() {
                let slot = pairs.active_slots()[i];
                let pair = pairs.get_mut(slot);
                if pair.has_contact() {
                    solve_pair(pair);
                }
            }
        }
    }

    /// Snapshots the bodies, combines the materials and applies last tick's impulse.
    fn pre_solve(
        &self,
        pair: &mut CollisionPair,
        bodies: &BodyArena,
        combiner: &dyn MaterialCombiner,
    ) {
        let body_a = bodies.get_body(pair.key.a);
        let body_b = bodies.get_body(pair.key.b);

        pair.velocity_a = body_a.linear_velocity;
        pair.velocity_b = body_b.linear_velocity;
        pair.inv_mass_a = bodies.effective_inv_mass(pair.key.a);
        pair.inv_mass_b = bodies.effective_inv_mass(pair.key.b);
        pair.friction = combiner.friction(&body_a.material, &body_b.material);
        pair.restitution = combiner.restitution(&body_a.material, &body_b.material);

        // the bounce target comes from the approach speed before warm starting
        let vn = (pair.velocity_b - pair.velocity_a).dot(pair.normal);
        pair.velocity_bias = if -vn > self.restitution_threshold {
            -pair.restitution * vn
        } else {
            Fixed::ZERO
        };

        if !pair.normal_impulse.is_zero() || !pair.tangent_impulse.is_zero() {
            let tangent = pair.normal.perp();
            let impulse = pair.normal * pair.normal_impulse + tangent * pair.tangent_impulse;
            apply_to_snapshot(pair, impulse);
        }
    }
}

fn apply_to_snapshot(pair: &mut CollisionPair, impulse: FVec2) {
    pair.velocity_a -= impulse * pair.inv_mass_a;
    pair.velocity_b += impulse * pair.inv_mass_b;
}

fn solve_pair(pair: &mut CollisionPair) {
    let inv_mass_sum = pair.inv_mass_a + pair.inv_mass_b;
    if inv_mass_sum.is_zero() {
        return;
    }

    let normal = pair.normal;
    let vn = (pair.velocity_b - pair.velocity_a).dot(normal);

    // separating with nothing to withdraw, leave it to position correction
    if !vn.is_negative() && pair.normal_impulse.is_zero() {
        return;
    }

    // clamp the accumulated impulse, contacts can only push
    let lambda = (pair.velocity_bias - vn) / inv_mass_sum;
    let old_impulse = pair.normal_impulse;
    pair.normal_impulse = (old_impulse + lambda).max(Fixed::ZERO);
    let lambda = pair.normal_impulse - old_impulse;
    apply_to_snapshot(pair, normal * lambda);

    // friction, bounded by the current normal impulse
    let tangent = normal.perp();
    let vt = (pair.velocity_b - pair.velocity_a).dot(tangent);
    let lambda = -vt / inv_mass_sum;
    let max_friction = (pair.friction * pair.normal_impulse).abs();
    let old_impulse = pair.tangent_impulse;
    pair.tangent_impulse = (old_impulse + lambda).clamp(-max_friction, max_friction);
    let lambda = pair.tangent_impulse - old_impulse;
    apply_to_snapshot(pair, tangent * lambda);
}

/// Commits the solved impulses to the velocities of awake dynamic bodies.
///
/// Each side receives the accumulated impulse scaled by its own inverse mass, which is exactly
/// the change the solver made to its snapshot of that body.
pub fn apply_impulses(pairs: &PairPool, bodies: &mut BodyArena) {
    for pair in pairs.iter_active() {
        if !pair.has_contact() {
            continue;
        }
        let (a, b) = (pair.key.a, pair.key.b);
        if bodies.is_sleeping(a) && bodies.is_sleeping(b) {
            continue;
        }

        let impulse = pair.normal * pair.normal_impulse + pair.normal.perp() * pair.tangent_impulse;
        if bodies.is_awake_dynamic(a) {
            bodies.get_body_mut(a).linear_velocity -= impulse * pair.inv_mass_a;
        }
        if bodies.is_awake_dynamic(b) {
            bodies.get_body_mut(b).linear_velocity += impulse * pair.inv_mass_b;
        }
    }
}
