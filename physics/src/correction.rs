use crate::{body::BodyArena, contact::PairPool, math::Fixed};

/// Baumgarte style position correction.
///
/// Removes `correction_percentage` of the penetration beyond `slop` each tick, split along the
/// contact normal by inverse mass. Static and sleeping bodies count as immovable.
pub fn correct_positions(
    pairs: &PairPool,
    bodies: &mut BodyArena,
    slop: Fixed,
    correction_percentage: Fixed,
) {
    for pair in pairs.iter_active() {
        if !pair.has_contact() || pair.penetration <= slop {
            continue;
        }

        let (a, b) = (pair.key.a, pair.key.b);
        let inv_mass_a = bodies.effective_inv_mass(a);
        let inv_mass_b = bodies.effective_inv_mass(b);
        let total_inv_mass = inv_mass_a + inv_mass_b;
        if total_inv_mass.is_zero() {
            continue;
        }

        let correction = pair.normal * ((pair.penetration - slop) * correction_percentage);
        if !inv_mass_a.is_zero() {
            bodies.get_body_mut(a).position -= correction * (inv_mass_a / total_inv_mass);
        }
        if !inv_mass_b.is_zero() {
            bodies.get_body_mut(b).position += correction * (inv_mass_b / total_inv_mass);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        body::{Body, BodyHandle, MassProps},
        contact::PairKey,
        math::FVec2,
        shapes::{Collider, ShapeKind},
    };

    fn overlapping(penetration: i64) -> (BodyArena, PairPool) {
        let collider = Collider::new(ShapeKind::Circle, 0);
        let mut bodies = BodyArena::new();
        bodies.add(Body::new(FVec2::ZERO, collider));
        bodies.add(Body::new(FVec2::from_int(10, 0), collider));

        let mut pairs = PairPool::new(1);
        let slot = pairs
            .activate(PairKey::new(BodyHandle(0), BodyHandle(1)))
            .unwrap();
        let pair = pairs.get_mut(slot);
        pair.contact_count = 1;
        pair.normal = FVec2::X;
        pair.penetration = Fixed::from_int(penetration);
        (bodies, pairs)
    }

    #[test]
    fn test_split_by_inverse_mass() {
        let (mut bodies, pairs) = overlapping(11);
        correct_positions(&pairs, &mut bodies, Fixed::ONE, Fixed::HALF);
        let a = bodies.get_body(BodyHandle(0)).position;
        let b = bodies.get_body(BodyHandle(1)).position;
        assert_eq!(a, FVec2::new(Fixed::from_ratio(-5, 2), Fixed::ZERO));
        assert_eq!(b, FVec2::new(Fixed::from_ratio(25, 2), Fixed::ZERO));
    }

    #[test]
    fn test_static_side_is_immovable() {
        let (mut bodies, pairs) = overlapping(11);
        bodies.get_body_mut(BodyHandle(0)).mass = MassProps::STATIC;
        correct_positions(&pairs, &mut bodies, Fixed::ONE, Fixed::HALF);
        assert_eq!(bodies.get_body(BodyHandle(0)).position, FVec2::ZERO);
        assert_eq!(bodies.get_body(BodyHandle(1)).position, FVec2::from_int(15, 0));

        // both immovable
        bodies.get_body_mut(BodyHandle(1)).mass = MassProps::STATIC;
        correct_positions(&pairs, &mut bodies, Fixed::ONE, Fixed::HALF);
        assert_eq!(bodies.get_body(BodyHandle(1)).position, FVec2::from_int(15, 0));
    }

    #[test]
    fn test_within_slop() {
        let (mut bodies, pairs) = overlapping(1);
        correct_positions(&pairs, &mut bodies, Fixed::ONE, Fixed::HALF);
        assert_eq!(bodies.get_body(BodyHandle(0)).position, FVec2::ZERO);
        assert_eq!(bodies.get_body(BodyHandle(1)).position, FVec2::from_int(10, 0));
    }
}
