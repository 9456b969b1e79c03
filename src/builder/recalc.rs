use crate::core::geometry::*;

use super::primref::*;

/// Geometry back-end: per-mesh linear bounds and time-segment counts.
/// Queried only through `RecalculatePrimRef`.
pub trait MotionGeometry: Sync {
    /// Two-endpoint bounds of the primitive over `time_range`.
    fn linear_bounds(&self, geom_id: u32, prim_id: u32, time_range: &Bounds1f) -> LBBox3f;

    /// Number of motion segments of the mesh, at least 1.
    fn num_time_segments(&self, geom_id: u32) -> u32;
}

/// Recomputes a primitive reference for a sub-interval of the shutter.
#[derive(Copy, Clone)]
pub struct RecalculatePrimRef<'a, G: MotionGeometry> {
    scene: &'a G,
}

impl<'a, G: MotionGeometry> RecalculatePrimRef<'a, G> {
    pub fn new(scene: &'a G) -> Self {
        RecalculatePrimRef { scene }
    }

    /// New reference with bounds and active segment count recomputed
    /// over `time_range`, plus the overlapped segment range.
    pub fn recalculate(
        &self,
        prim: &PrimRefMB,
        time_range: &Bounds1f,
    ) -> (PrimRefMB, SegmentRange) {
        let geom_id = prim.geom_id;
        let prim_id = prim.prim_id;
        let lbounds = self.scene.linear_bounds(geom_id, prim_id, time_range);
        let num_time_segments = self.scene.num_time_segments(geom_id);
        let tbounds = time_segment_range(time_range, num_time_segments);
        assert!(tbounds.size() > 0);
        let prim2 = PrimRefMB::new(
            &lbounds,
            tbounds.size() as u32,
            num_time_segments,
            geom_id,
            prim_id,
        );
        return (prim2, tbounds);
    }

    /// Bounds-only variant used by the temporal-split search.
    pub fn linear_bounds(
        &self,
        prim: &PrimRefMB,
        time_range: &Bounds1f,
    ) -> (LBBox3f, SegmentRange) {
        let lbounds = self
            .scene
            .linear_bounds(prim.geom_id, prim.prim_id, time_range);
        let num_time_segments = self.scene.num_time_segments(prim.geom_id);
        let tbounds = time_segment_range(time_range, num_time_segments);
        assert!(tbounds.size() > 0);
        return (lbounds, tbounds);
    }
}
