use crate::{
    body::BodyArena,
    error::{PhysicsError, Result},
    math::{FVec2, Fixed},
};
use serde::{Deserialize, Serialize};

/// Circular volume that slows down bodies whose position lies inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DampingField {
    pub centre: FVec2,
    pub radius: Fixed,
    /// Velocity multiplier in `(0, 1]`. Overlapping fields multiply.
    pub factor: Fixed,
}

impl DampingField {
    pub fn new(centre: FVec2, radius: Fixed, factor: Fixed) -> Result<Self> {
        let field = Self {
            centre,
            radius,
            factor,
        };
        field.validate()?;
        Ok(field)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_positive() {
            return Err(PhysicsError::InvalidDampingField(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !self.factor.is_positive() || self.factor > Fixed::ONE {
            return Err(PhysicsError::InvalidDampingField(format!(
                "factor must be within (0, 1], got {}",
                self.factor
            )));
        }
        Ok(())
    }

    fn contains(&self, radius_squared: i128, point: FVec2) -> bool {
        let d = point - self.centre;
        if d.x.abs() > self.radius || d.y.abs() > self.radius {
            return false;
        }
        d.length_squared_wide() <= radius_squared
    }
}

/// Refreshes the applied damping cache of every body.
///
/// Bodies that already carry a cache are recomputed every tick, which resets them to one once
/// they leave all fields. Other bodies only get a cache the first time they are found inside a
/// field.
pub fn update_field_damping(bodies: &mut BodyArena, fields: &[DampingField]) {
    if fields.is_empty() {
        let handles: Vec<_> = bodies.handles().collect();
        for handle in handles {
            if let Some(damping) = bodies.applied_damping_mut(handle) {
                *damping = Fixed::ONE;
            }
        }
        return;
    }

    let cached: Vec<(&DampingField, i128)> = fields
        .iter()
        .map(|field| (field, field.radius.square_wide()))
        .collect();

    let handles: Vec<_> = bodies.handles().collect();
    for handle in handles {
        let position = bodies.get_body(handle).position;
        let mut inside = false;
        let mut product = Fixed::ONE;
        for (field, radius_squared) in &cached {
            if field.contains(*radius_squared, position) {
                inside = true;
                product *= field.factor;
            }
        }

        let damping = bodies.applied_damping_mut(handle);
        if damping.is_some() || inside {
            *damping = Some(product);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{body::Body, shapes::{Collider, ShapeKind}};

    #[test]
    fn test_field_damping_cache() {
        let collider = Collider::new(ShapeKind::Circle, 0);
        let mut bodies = BodyArena::new();
        let inside_both = bodies.add(Body::new(FVec2::from_int(10, 0), collider));
        let outside = bodies.add(Body::new(FVec2::from_int(1000, 0), collider));

        let fields = [
            DampingField::new(FVec2::ZERO, Fixed::from_int(50), Fixed::HALF).unwrap(),
            DampingField::new(FVec2::from_int(20, 0), Fixed::from_int(10), Fixed::HALF).unwrap(),
        ];
        update_field_damping(&mut bodies, &fields);
        assert_eq!(bodies.applied_damping(inside_both), Some(Fixed::from_ratio(1, 4)));
        assert_eq!(bodies.applied_damping(outside), None);

        // leaving every field restores full response immediately
        bodies.get_body_mut(inside_both).position = FVec2::from_int(500, 0);
        update_field_damping(&mut bodies, &fields);
        assert_eq!(bodies.applied_damping(inside_both), Some(Fixed::ONE));

        bodies.get_body_mut(inside_both).position = FVec2::ZERO;
        update_field_damping(&mut bodies, &fields);
        assert_eq!(bodies.applied_damping(inside_both), Some(Fixed::HALF));
        update_field_damping(&mut bodies, &[]);
        assert_eq!(bodies.applied_damping(inside_both), Some(Fixed::ONE));
        assert_eq!(bodies.applied_damping(outside), None);
    }

    #[test]
    fn test_field_validation() {
        assert!(DampingField::new(FVec2::ZERO, Fixed::ONE, Fixed::ZERO).is_err());
        assert!(DampingField::new(FVec2::ZERO, Fixed::ONE, Fixed::from_int(2)).is_err());
        assert!(DampingField::new(FVec2::ZERO, Fixed::ZERO, Fixed::HALF).is_err());
        assert!(DampingField::new(FVec2::ZERO, Fixed::ONE, Fixed::ONE).is_ok());
    }
}
