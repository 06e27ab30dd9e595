use crate::{
    body::BodyArena,
    math::{FVec2, Fixed},
};

/// Velocities below these are snapped to zero after damping.
#[derive(Copy, Clone, Debug)]
pub struct SnapThresholds {
    pub linear: Fixed,
    pub angular: Fixed,
}

/// Semi-implicit Euler step for every awake dynamic body.
///
/// Forces are consumed by this step. They are cleared on every body, including static and
/// sleeping ones, so force input never carries over to a later tick.
pub fn integrate_bodies(bodies: &mut BodyArena, dt: Fixed, snap: SnapThresholds) {
    let linear_snap_squared = snap.linear.square_wide();

    let handles: Vec<_> = bodies.handles().collect();
    for handle in handles {
        let awake = bodies.is_awake_dynamic(handle);
        let field_damping = bodies.applied_damping(handle).unwrap_or(Fixed::ONE);
        let body = bodies.get_body_mut(handle);
        let force = std::mem::replace(&mut body.force, FVec2::ZERO);
        if !awake {
            continue;
        }

        body.linear_velocity += force * dt;

        body.previous_position = body.position;
        body.position += body.linear_velocity * dt;
        body.rotation += body.angular_velocity * dt;

        let damping = body.material.damping * field_damping;
        body.linear_velocity *= damping;
        body.angular_velocity *= damping;

        if body.linear_velocity.length_squared_wide() < linear_snap_squared {
            body.linear_velocity = FVec2::ZERO;
        }
        if body.angular_velocity.abs() < snap.angular {
            body.angular_velocity = Fixed::ZERO;
        }
    }
}
