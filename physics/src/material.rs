use crate::math::Fixed;
use serde::{Deserialize, Serialize};

/// Surface response of a body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub friction: Fixed,
    pub restitution: Fixed,
    /// Per-tick velocity multiplier, one means no damping.
    pub damping: Fixed,
}

impl Material {
    pub const fn new(friction: Fixed, restitution: Fixed, damping: Fixed) -> Self {
        Self {
            friction,
            restitution,
            damping,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: Fixed::HALF,
            restitution: Fixed::ZERO,
            damping: Fixed::ONE,
        }
    }
}

/// Combines the materials of two touching bodies into the coefficients the solver uses.
pub trait MaterialCombiner {
    fn friction(&self, a: &Material, b: &Material) -> Fixed;
    fn restitution(&self, a: &Material, b: &Material) -> Fixed;
}

/// Multiplies the two coefficients, so a frictionless or inelastic side wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct MultiplyCombiner;

impl MaterialCombiner for MultiplyCombiner {
    fn friction(&self, a: &Material, b: &Material) -> Fixed {
        a.friction * b.friction
    }

    fn restitution(&self, a: &Material, b: &Material) -> Fixed {
        a.restitution * b.restitution
    }
}

#[test]
fn test_multiply_combiner() {
    let ice = Material::new(Fixed::ZERO, Fixed::HALF, Fixed::ONE);
    let rubber = Material::new(Fixed::ONE, Fixed::ONE, Fixed::ONE);
    let combiner = MultiplyCombiner;
    assert_eq!(combiner.friction(&ice, &rubber), Fixed::ZERO);
    assert_eq!(combiner.restitution(&ice, &rubber), Fixed::HALF);
    assert_eq!(combiner.restitution(&rubber, &rubber), Fixed::ONE);
}
