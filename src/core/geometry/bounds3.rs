use crate::core::base::*;
use crate::core::geometry::vector3::*;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Bounds3f {
    pub min: Vector3f,
    pub max: Vector3f,
}

impl Bounds3f {
    pub fn new(min: &Vector3f, max: &Vector3f) -> Self {
        Bounds3f {
            min: *min,
            max: *max,
        }
    }

    /// Inverted box; unions with it behave as identity.
    pub fn empty() -> Self {
        Bounds3f {
            min: Vector3f::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            max: Vector3f::new(Float::NEG_INFINITY, Float::NEG_INFINITY, Float::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z;
    }

    pub fn diagonal(&self) -> Vector3f {
        return self.max - self.min;
    }

    pub fn center(&self) -> Vector3f {
        return (self.min + self.max) * 0.5;
    }

    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            return 0;
        } else if d.y > d.z {
            return 1;
        } else {
            return 2;
        }
    }

    /// Position of `p` relative to the box corners, in [0,1] per axis for
    /// interior points. Degenerate axes map to 0.
    pub fn offset(&self, p: &Vector3f) -> Vector3f {
        let mut o = *p - self.min;
        if self.max.x > self.min.x {
            o.x = o.x / (self.max.x - self.min.x);
        }
        if self.max.y > self.min.y {
            o.y = o.y / (self.max.y - self.min.y);
        }
        if self.max.z > self.min.z {
            o.z = o.z / (self.max.z - self.min.z);
        }
        return o;
    }

    pub fn union(&self, other: &Self) -> Self {
        return Bounds3f {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        };
    }

    pub fn union_p(&self, p: &Vector3f) -> Self {
        return Bounds3f {
            min: self.min.min(p),
            max: self.max.max(p),
        };
    }

    /// Sum of the three pairwise extent products, half the surface area.
    pub fn half_area(&self) -> Float {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        return d.x * d.y + d.x * d.z + d.y * d.z;
    }

    pub fn surface_area(&self) -> Float {
        return 2.0 * self.half_area();
    }
}

impl Default for Bounds3f {
    fn default() -> Self {
        Bounds3f::empty()
    }
}

impl From<((Float, Float, Float), (Float, Float, Float))> for Bounds3f {
    fn from(value: ((Float, Float, Float), (Float, Float, Float))) -> Self {
        Bounds3f {
            min: Vector3f::from(value.0),
            max: Vector3f::from(value.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_union() {
        let a = Bounds3f::from(((-1.0, 0.0, 0.0), (2.0, 1.0, 1.0)));
        let e = Bounds3f::empty();
        assert!(e.is_empty());
        assert_eq!(a, e.union(&a));
        assert_eq!(a, a.union(&e));
        assert_eq!(e.half_area(), 0.0);
    }

    #[test]
    fn test_half_area() {
        let b = Bounds3f::from(((0.0, 0.0, 0.0), (2.0, 3.0, 4.0)));
        assert_eq!(b.half_area(), 2.0 * 3.0 + 2.0 * 4.0 + 3.0 * 4.0);
        assert_eq!(b.surface_area(), 2.0 * b.half_area());
    }

    #[test]
    fn test_maximum_extent() {
        let b = Bounds3f::from(((0.0, 0.0, 0.0), (1.0, 5.0, 2.0)));
        assert_eq!(b.maximum_extent(), 1);
    }

    #[test]
    fn test_offset() {
        let b = Bounds3f::from(((0.0, 0.0, 0.0), (2.0, 2.0, 2.0)));
        let o = b.offset(&Vector3f::new(1.0, 0.5, 2.0));
        assert_eq!(o, Vector3f::new(0.5, 0.25, 1.0));
    }
}
