use super::Fixed;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// 2D vector of [`Fixed`] components.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FVec2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl FVec2 {
    pub const ZERO: Self = Self::new(Fixed::ZERO, Fixed::ZERO);
    pub const X: Self = Self::new(Fixed::ONE, Fixed::ZERO);
    pub const Y: Self = Self::new(Fixed::ZERO, Fixed::ONE);

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn from_int(x: i64, y: i64) -> Self {
        Self::new(Fixed::from_int(x), Fixed::from_int(y))
    }

    #[inline]
    pub const fn splat(v: Fixed) -> Self {
        Self::new(v, v)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> Fixed {
        self.x * rhs.x + self.y * rhs.y
    }

    /// z component of the 3D cross product of the two vectors embedded in the XY plane.
    #[inline]
    pub fn cross(self, rhs: Self) -> Fixed {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Saturates for vectors longer than about 46 340, see [`FVec2::length_squared_wide`].
    #[inline]
    pub fn length_squared(self) -> Fixed {
        self.dot(self)
    }

    /// Squared length in Q32.32 held in `i128`. Exact for every representable vector.
    #[inline]
    pub fn length_squared_wide(self) -> i128 {
        self.x.square_wide() + self.y.square_wide()
    }

    #[inline]
    pub fn length(self) -> Fixed {
        Fixed::hypot(self.x, self.y)
    }

    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len.is_zero() {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Rotates by an angle given as its precomputed sine and cosine.
    #[inline]
    pub fn rotate(self, sin: Fixed, cos: Fixed) -> Self {
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    pub fn from_vec2(v: glam::Vec2) -> Self {
        Self::new(Fixed::from_f32(v.x), Fixed::from_f32(v.y))
    }

    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

impl Add for FVec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for FVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Fixed> for FVec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Fixed) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for FVec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for FVec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FVec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<Fixed> for FVec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = *self * rhs;
    }
}

#[test]
fn test_long_vectors() {
    let v = FVec2::from_int(60_000, 80_000);
    assert_eq!(v.length(), Fixed::from_int(100_000));
    assert_eq!(v.length_squared_wide(), 10_000_000_000i128 << 32);
    assert_eq!(v.length_squared(), Fixed::MAX);
}

#[test]
fn test_fvec2() {
    let a = FVec2::from_int(3, 4);
    assert_eq!(a.length(), Fixed::from_int(5));
    assert_eq!(a.dot(FVec2::X), Fixed::from_int(3));
    assert_eq!(FVec2::X.cross(FVec2::Y), Fixed::ONE);
    assert_eq!(FVec2::X.perp(), FVec2::Y);
    assert_eq!(FVec2::ZERO.normalize_or_zero(), FVec2::ZERO);

    let n = a.normalize_or_zero();
    assert!((n.x.to_f64() - 0.6).abs() < 1e-8);
    assert!((n.y.to_f64() - 0.8).abs() < 1e-8);

    let (sin, cos) = Fixed::HALF_PI.sin_cos();
    let r = FVec2::X.rotate(sin, cos);
    assert!(r.x.abs().to_f64() < 1e-8);
    assert!((r.y.to_f64() - 1.0).abs() < 1e-8);
}
