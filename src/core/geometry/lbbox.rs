use crate::core::base::*;
use crate::core::geometry::bounds3::*;

/// Linear bounds: boxes at the two endpoints of a time range. Bounds at
/// interior times are the componentwise lerp of the endpoints.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct LBBox3f {
    pub bounds0: Bounds3f,
    pub bounds1: Bounds3f,
}

impl LBBox3f {
    pub fn new(bounds0: &Bounds3f, bounds1: &Bounds3f) -> Self {
        LBBox3f {
            bounds0: *bounds0,
            bounds1: *bounds1,
        }
    }

    pub fn empty() -> Self {
        LBBox3f {
            bounds0: Bounds3f::empty(),
            bounds1: Bounds3f::empty(),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        return LBBox3f {
            bounds0: self.bounds0.union(&other.bounds0),
            bounds1: self.bounds1.union(&other.bounds1),
        };
    }

    /// Static box covering the whole time range.
    pub fn bounds(&self) -> Bounds3f {
        return self.bounds0.union(&self.bounds1);
    }

    pub fn interpolate(&self, t: Float) -> Bounds3f {
        let s = 1.0 - t;
        return Bounds3f {
            min: self.bounds0.min * s + self.bounds1.min * t,
            max: self.bounds0.max * s + self.bounds1.max * t,
        };
    }

    /// Time-averaged half-area over the range. With extents linear in t,
    /// each pairwise product integrates to
    /// (2*a0*b0 + a0*b1 + a1*b0 + 2*a1*b1) / 6.
    pub fn expected_half_area(&self) -> Float {
        if self.bounds0.is_empty() || self.bounds1.is_empty() {
            return 0.0;
        }
        let d0 = self.bounds0.diagonal();
        let d1 = self.bounds1.diagonal();
        let mut area = 0.0;
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            area += (2.0 * d0[i] * d0[j] + d0[i] * d1[j] + d1[i] * d0[j] + 2.0 * d1[i] * d1[j])
                / 6.0;
        }
        return area;
    }
}

impl Default for LBBox3f {
    fn default() -> Self {
        LBBox3f::empty()
    }
}

impl From<Bounds3f> for LBBox3f {
    fn from(b: Bounds3f) -> Self {
        LBBox3f::new(&b, &b)
    }
}
