use crate::{
    body::{BodyArena, Motion},
    math::Fixed,
};

/// Updates the motion record of every dynamic body, creating it on first sight.
///
/// The low motion counter counts consecutive ticks in which both speeds stayed below their
/// thresholds and saturates instead of wrapping.
pub fn track_motion(bodies: &mut BodyArena, linear_threshold: Fixed, angular_threshold: Fixed) {
    let handles: Vec<_> = bodies.handles().collect();
    for handle in handles {
        let body = bodies.get_body(handle);
        if body.is_static() {
            continue;
        }
        let linear_speed = body.linear_velocity.length();
        let angular_speed = body.angular_velocity.abs();

        let motion = bodies.motion_mut(handle).get_or_insert_with(Motion::default);
        motion.linear_speed = linear_speed;
        motion.angular_speed = angular_speed;
        if linear_speed < linear_threshold && angular_speed < angular_threshold {
            motion.low_motion_ticks = motion.low_motion_ticks.saturating_add(1);
        } else {
            motion.low_motion_ticks = 0;
        }
    }
}
