use crate::math::{FVec2, Fixed};
use std::ops::Add;

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub mins: FVec2,
    pub maxs: FVec2,
}

impl Bounds {
    /// An inverted box that any point expands.
    pub fn new() -> Bounds {
        Bounds {
            mins: FVec2::splat(Fixed::MAX),
            maxs: FVec2::splat(Fixed::MIN),
        }
    }

    pub fn from_centre_half_extents(centre: FVec2, half_extents: FVec2) -> Bounds {
        Bounds {
            mins: centre - half_extents,
            maxs: centre + half_extents,
        }
    }

    /// Touching boxes count as overlapping.
    pub fn intersects(&self, rhs: &Self) -> bool {
        self.mins.x <= rhs.maxs.x
            && rhs.mins.x <= self.maxs.x
            && self.mins.y <= rhs.maxs.y
            && rhs.mins.y <= self.maxs.y
    }
}

impl Default for Bounds {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Add<FVec2> for Bounds {
    type Output = Self;
    fn add(self, pt: FVec2) -> Self::Output {
        Bounds {
            mins: self.mins.min(pt),
            maxs: self.maxs.max(pt),
        }
    }
}

#[test]
fn test_bounds() {
    let b = [
        FVec2::from_int(-1, 2),
        FVec2::from_int(3, -4),
        FVec2::from_int(0, 0),
    ]
    .iter()
    .fold(Bounds::new(), |acc, pt| acc + *pt);
    assert_eq!(b.mins, FVec2::from_int(-1, -4));
    assert_eq!(b.maxs, FVec2::from_int(3, 2));

    let touching = Bounds::from_centre_half_extents(FVec2::from_int(4, 0), FVec2::from_int(1, 1));
    assert!(b.intersects(&touching));
    let apart = Bounds::from_centre_half_extents(FVec2::from_int(10, 0), FVec2::from_int(1, 1));
    assert!(!b.intersects(&apart));
}
