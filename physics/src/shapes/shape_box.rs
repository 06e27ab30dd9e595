use super::{ShapeKind, ShapeTrait};
use crate::{
    bounds::Bounds,
    error::{PhysicsError, Result},
    math::{FVec2, Fixed},
};
use serde::{Deserialize, Serialize};

/// Box centred on the body origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeBox {
    pub half_extents: FVec2,
}

impl ShapeBox {
    pub fn new(half_extents: FVec2) -> Result<Self> {
        if !half_extents.x.is_positive() || !half_extents.y.is_positive() {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Box,
                reason: format!(
                    "half extents must be positive, got ({}, {})",
                    half_extents.x, half_extents.y
                ),
            });
        }
        Ok(Self { half_extents })
    }

    /// Local corners in counter-clockwise order.
    pub fn vertices(&self) -> [FVec2; 4] {
        let FVec2 { x: hx, y: hy } = self.half_extents;
        [
            FVec2::new(-hx, -hy),
            FVec2::new(hx, -hy),
            FVec2::new(hx, hy),
            FVec2::new(-hx, hy),
        ]
    }
}

impl ShapeTrait for ShapeBox {
    fn bounds(&self, pos: FVec2, sin: Fixed, cos: Fixed) -> Bounds {
        // project the rotated half extents onto the world axes
        let (sin, cos) = (sin.abs(), cos.abs());
        let h = self.half_extents;
        let extents = FVec2::new(cos * h.x + sin * h.y, sin * h.x + cos * h.y);
        Bounds::from_centre_half_extents(pos, extents)
    }
}

#[test]
fn test_box_bounds_rotated() {
    let shape = ShapeBox::new(FVec2::from_int(20, 10)).unwrap();

    let (sin, cos) = Fixed::ZERO.sin_cos();
    let b = shape.bounds(FVec2::from_int(5, 5), sin, cos);
    assert_eq!(b.mins, FVec2::from_int(-15, -5));
    assert_eq!(b.maxs, FVec2::from_int(25, 15));

    // a quarter turn swaps the extents
    let (sin, cos) = Fixed::HALF_PI.sin_cos();
    let b = shape.bounds(FVec2::ZERO, sin, cos);
    assert!((b.maxs.x.to_f64() - 10.0).abs() < 1e-5);
    assert!((b.maxs.y.to_f64() - 20.0).abs() < 1e-5);

    assert!(ShapeBox::new(FVec2::from_int(0, 1)).is_err());
}
