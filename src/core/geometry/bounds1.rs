use crate::core::base::*;

/// Closed time interval, a sub-range of the normalized shutter `[0,1]`.
#[derive(Debug, PartialEq, Default, Copy, Clone)]
pub struct Bounds1f {
    pub min: Float,
    pub max: Float,
}

impl Bounds1f {
    pub fn new(min: Float, max: Float) -> Self {
        Bounds1f { min, max }
    }

    pub fn size(&self) -> Float {
        return self.max - self.min;
    }

    pub fn center(&self) -> Float {
        return 0.5 * (self.min + self.max);
    }

    pub fn contains(&self, other: &Bounds1f) -> bool {
        return self.min <= other.min && other.max <= self.max;
    }
}

impl From<(Float, Float)> for Bounds1f {
    fn from(value: (Float, Float)) -> Self {
        Bounds1f::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let t = Bounds1f::new(0.25, 0.75);
        assert_eq!(t.size(), 0.5);
        assert_eq!(t.center(), 0.5);
        assert!(Bounds1f::new(0.0, 1.0).contains(&t));
        assert!(!t.contains(&Bounds1f::new(0.0, 1.0)));
    }
}
