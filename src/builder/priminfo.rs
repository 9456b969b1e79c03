use crate::core::base::*;
use crate::core::geometry::*;

use super::primref::*;

/// Aggregated statistics over a primitive set; kept coherent with the
/// set it was accumulated from.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct PrimInfoMB {
    pub num: usize,
    pub geom_bounds: Bounds3f,
    pub cent_bounds: Bounds3f,
    pub lbounds: LBBox3f,
    pub time_range: Bounds1f,
    pub max_num_time_segments: u32,
}

impl PrimInfoMB {
    pub fn empty(time_range: &Bounds1f) -> Self {
        PrimInfoMB {
            num: 0,
            geom_bounds: Bounds3f::empty(),
            cent_bounds: Bounds3f::empty(),
            lbounds: LBBox3f::empty(),
            time_range: *time_range,
            max_num_time_segments: 0,
        }
    }

    pub fn from_prims(prims: &[PrimRefMB], time_range: &Bounds1f) -> Self {
        let mut info = PrimInfoMB::empty(time_range);
        for prim in prims.iter() {
            info.add_prim_ref(prim);
        }
        return info;
    }

    pub fn add_prim_ref(&mut self, prim: &PrimRefMB) {
        self.num += 1;
        self.geom_bounds = self.geom_bounds.union(&prim.bounds());
        self.cent_bounds = self.cent_bounds.union_p(&prim.center());
        self.lbounds = self.lbounds.union(&prim.lbounds);
        self.max_num_time_segments = self.max_num_time_segments.max(prim.total_time_segments);
    }

    pub fn size(&self) -> usize {
        return self.num;
    }

    /// Half-area term for the traversal cost, scaled by the time-range
    /// size so it stays comparable with the temporal-split SAH.
    pub fn half_area(&self) -> Float {
        return self.geom_bounds.half_area() * self.time_range.size();
    }

    /// Cost of keeping this set as one leaf: time-averaged half-area
    /// times the block-quantised primitive count.
    pub fn leaf_sah(&self, log_block_size: usize) -> Float {
        return self.lbounds.expected_half_area()
            * num_blocks(self.num, log_block_size) as Float
            * self.time_range.size();
    }

    /// Rounds `t` onto the time-step grid of the finest-segmented
    /// primitive in the set.
    pub fn align_time(&self, t: Float) -> Float {
        if self.max_num_time_segments == 0 {
            return t;
        }
        let n = self.max_num_time_segments as Float;
        return (t * n).round() / n;
    }
}
