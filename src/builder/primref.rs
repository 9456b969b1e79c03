use crate::core::base::*;
use crate::core::geometry::*;

/// Reference to one motion-blurred primitive, immutable for the duration
/// of a build. Temporal splits create new references with bounds
/// recomputed over a sub-interval of the shutter.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct PrimRefMB {
    pub lbounds: LBBox3f,
    pub active_time_segments: u32,
    pub total_time_segments: u32,
    pub geom_id: u32,
    pub prim_id: u32,
}

impl PrimRefMB {
    pub fn new(
        lbounds: &LBBox3f,
        active_time_segments: u32,
        total_time_segments: u32,
        geom_id: u32,
        prim_id: u32,
    ) -> Self {
        PrimRefMB {
            lbounds: *lbounds,
            active_time_segments,
            total_time_segments,
            geom_id,
            prim_id,
        }
    }

    /// Static bounds over the reference's whole time range.
    pub fn bounds(&self) -> Bounds3f {
        return self.lbounds.bounds();
    }

    pub fn center(&self) -> Vector3f {
        return self.bounds().center();
    }

    /// Total, content-derived order used to restore a deterministic
    /// primitive ordering after partitioning. `(geom_id, prim_id)` is
    /// unique within any one primitive array.
    pub fn sort_key(&self) -> (u32, u32) {
        return (self.geom_id, self.prim_id);
    }
}

/// Half-open range of integer time segments.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct SegmentRange {
    pub begin: i32,
    pub end: i32,
}

impl SegmentRange {
    pub fn new(begin: i32, end: i32) -> Self {
        SegmentRange { begin, end }
    }

    pub fn size(&self) -> i32 {
        return self.end - self.begin;
    }

    pub fn center(&self) -> i32 {
        return (self.begin + self.end) / 2;
    }
}

/// Integer time segments of a mesh with `num_segments` segments that
/// overlap the time range `r`. Never empty; exact boundaries are nudged
/// by a couple of ulps so they land on the matching time step.
pub fn time_segment_range(r: &Bounds1f, num_segments: u32) -> SegmentRange {
    let n = num_segments as Float;
    let round_up = 1.0 + 2.0 * Float::EPSILON;
    let round_down = 1.0 - 2.0 * Float::EPSILON;
    let begin = (r.min * n * round_up).floor().max(0.0) as i32;
    let begin = begin.min(num_segments as i32 - 1).max(0);
    let end = (r.max * n * round_down).ceil() as i32;
    let end = end.min(num_segments as i32).max(begin + 1);
    return SegmentRange::new(begin, end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_range() {
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.0, 1.0), 4),
            SegmentRange::new(0, 4)
        );
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.0, 1.0), 1),
            SegmentRange::new(0, 1)
        );
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.5, 1.0), 4),
            SegmentRange::new(2, 4)
        );
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.0, 0.5), 4),
            SegmentRange::new(0, 2)
        );
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.25, 0.75), 4),
            SegmentRange::new(1, 3)
        );
    }

    #[test]
    fn test_interior_range() {
        // Segments 0 and 1 overlap [0.1, 0.35] for a 4-segment mesh.
        assert_eq!(
            time_segment_range(&Bounds1f::new(0.1, 0.35), 4),
            SegmentRange::new(0, 2)
        );
    }

    #[test]
    fn test_degenerate_range_is_never_empty() {
        let r = time_segment_range(&Bounds1f::new(0.25, 0.25), 4);
        assert_eq!(r.size(), 1);
        let r = time_segment_range(&Bounds1f::new(1.0, 1.0), 4);
        assert_eq!(r.size(), 1);
        assert_eq!(r.end, 4);
    }

    #[test]
    fn test_sort_key_order() {
        let lb = LBBox3f::empty();
        let a = PrimRefMB::new(&lb, 1, 1, 0, 5);
        let b = PrimRefMB::new(&lb, 1, 1, 1, 0);
        assert!(a.sort_key() < b.sort_key());
    }
}
