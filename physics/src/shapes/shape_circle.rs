use super::{ShapeKind, ShapeTrait};
use crate::{
    bounds::Bounds,
    error::{PhysicsError, Result},
    math::{FVec2, Fixed},
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCircle {
    pub radius: Fixed,
}

impl ShapeCircle {
    pub fn new(radius: Fixed) -> Result<Self> {
        if !radius.is_positive() {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Circle,
                reason: format!("radius must be positive, got {}", radius),
            });
        }
        Ok(Self { radius })
    }
}

impl ShapeTrait for ShapeCircle {
    fn bounds(&self, pos: FVec2, _sin: Fixed, _cos: Fixed) -> Bounds {
        Bounds::from_centre_half_extents(pos, FVec2::splat(self.radius))
    }
}
