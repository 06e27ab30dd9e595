use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

const FRAC_BITS: u32 = 32;
const ONE_RAW: i64 = 1 << FRAC_BITS;
const ONE_F64: f64 = ONE_RAW as f64;

/// Signed Q32.32 fixed-point scalar.
///
/// All simulation arithmetic goes through this type so results are bit-identical on every
/// platform. Multiplication and division use `i128` intermediates, truncate toward negative
/// infinity and saturate at `MIN`/`MAX` instead of wrapping. Squared magnitudes that may exceed
/// the `i64` range are compared through the `*_wide` helpers. Host floats only enter or leave through the `from_*`/`to_*` conversions, which are
/// meant for config loading and presentation.
///
/// Serialized as a plain decimal number.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);
    pub const NEG_ONE: Self = Self(-ONE_RAW);
    pub const HALF: Self = Self(ONE_RAW >> 1);
    /// Smallest representable positive value.
    pub const EPSILON: Self = Self(1);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    pub const PI: Self = Self(13_493_037_705);
    pub const TWO_PI: Self = Self(26_986_075_409);
    pub const HALF_PI: Self = Self(6_746_518_852);

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn from_int(n: i64) -> Self {
        Self(n << FRAC_BITS)
    }

    /// `num / den` computed exactly in integer arithmetic, usable in `const` contexts.
    #[inline]
    pub const fn from_ratio(num: i64, den: i64) -> Self {
        Self((((num as i128) << FRAC_BITS) / den as i128) as i64)
    }

    pub fn from_f64(value: f64) -> Self {
        Self((value * ONE_F64).round() as i64)
    }

    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(value as f64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_F64
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn abs(self) -> Self {
        if self.0 < 0 {
            Self(-self.0)
        } else {
            self
        }
    }

    #[inline]
    pub const fn signum(self) -> Self {
        if self.0 > 0 {
            Self::ONE
        } else if self.0 < 0 {
            Self::NEG_ONE
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub const fn half(self) -> Self {
        Self(self.0 >> 1)
    }

    #[inline]
    pub const fn mul_int(self, n: i64) -> Self {
        Self(self.0 * n)
    }

    #[inline]
    pub const fn div_int(self, n: i64) -> Self {
        Self(self.0 / n)
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            None
        } else {
            Some(self / rhs)
        }
    }

    /// `self * rhs` in Q32.32 kept in `i128`, so it never saturates.
    #[inline]
    pub const fn mul_wide(self, rhs: Self) -> i128 {
        (self.0 as i128 * rhs.0 as i128) >> FRAC_BITS
    }

    #[inline]
    pub const fn square_wide(self) -> i128 {
        self.mul_wide(self)
    }

    /// `sqrt(x² + y²)` without forming the squares in `i64`. Saturates at `MAX`.
    pub fn hypot(x: Self, y: Self) -> Self {
        let xx = (x.0 as i128 * x.0 as i128) as u128;
        let yy = (y.0 as i128 * y.0 as i128) as u128;
        // both squares carry 64 fraction bits, the root carries 32
        Self(saturate(isqrt_u128(xx + yy) as i128))
    }

    /// Square root computed with the integer digit-by-digit method. Negative input yields zero.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        // sqrt(raw / 2^32) * 2^32 == sqrt(raw * 2^32)
        Self(isqrt_u128((self.0 as u128) << FRAC_BITS) as i64)
    }

    /// Sine of an angle in radians.
    ///
    /// The angle is reduced to `[-PI/2, PI/2]` and evaluated with a Taylor polynomial in Horner
    /// form. Only integer operations are involved.
    pub fn sin(self) -> Self {
        let mut r = reduce_angle(self.0);
        if r > Self::HALF_PI.0 {
            r = Self::PI.0 - r;
        } else if r < -Self::HALF_PI.0 {
            r = -Self::PI.0 - r;
        }

        let x = Self(r);
        let x2 = x * x;
        let mut acc = Self::ONE;
        for denom in [210, 156, 110, 72, 42, 20, 6] {
            acc = Self::ONE - (x2 * acc).div_int(denom);
        }
        x * acc
    }

    /// Cosine of an angle in radians. Exactly one at zero.
    pub fn cos(self) -> Self {
        let mut r = reduce_angle(self.0).abs();
        let flip = r > Self::HALF_PI.0;
        if flip {
            r = Self::PI.0 - r;
        }

        let x = Self(r);
        let x2 = x * x;
        let mut acc = Self::ONE;
        for denom in [182, 132, 90, 56, 30, 12, 2] {
            acc = Self::ONE - (x2 * acc).div_int(denom);
        }
        if flip {
            -acc
        } else {
            acc
        }
    }

    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }
}

/// Wraps a raw angle into `[-PI, PI]`.
fn reduce_angle(raw: i64) -> i64 {
    let mut r = raw % Fixed::TWO_PI.0;
    if r > Fixed::PI.0 {
        r -= Fixed::TWO_PI.0;
    } else if r < -Fixed::PI.0 {
        r += Fixed::TWO_PI.0;
    }
    r
}

#[inline]
fn saturate(value: i128) -> i64 {
    if value > i64::MAX as i128 {
        i64::MAX
    } else if value < i64::MIN as i128 {
        i64::MIN
    } else {
        value as i64
    }
}

fn isqrt_u128(mut n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut result = 0u128;
    // highest power of four not greater than n
    let mut bit = 1u128 << ((127 - n.leading_zeros()) & !1);
    while bit != 0 {
        if n >= result + bit {
            n -= result + bit;
            result = (result >> 1) + bit;
        } else {
            result >>= 1;
        }
        bit >>= 2;
    }
    result
}

impl From<f64> for Fixed {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Fixed> for f64 {
    fn from(value: Fixed) -> Self {
        value.to_f64()
    }
}

impl From<i32> for Fixed {
    fn from(value: i32) -> Self {
        Self::from_int(value as i64)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Fixed {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(saturate(self.mul_wide(rhs)))
    }
}

impl Div for Fixed {
    type Output = Self;
    /// Panics if `rhs` is zero, like integer division.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self(saturate(((self.0 as i128) << FRAC_BITS) / rhs.0 as i128))
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}
