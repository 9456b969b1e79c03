use crate::core::base::*;
use crate::core::geometry::*;

use super::priminfo::*;
use super::primvec::*;
use super::recalc::*;
use super::split::*;

/// Finds the best temporal split: evaluate cutting the set's time range
/// at its center, aligned to the time-step grid of the finest-segmented
/// primitive. Every primitive lands in both halves with bounds
/// recomputed over the sub-interval, so the SAH sums the full count on
/// each side.
pub fn find_temporal_split<G: MotionGeometry>(
    recalc: &RecalculatePrimRef<'_, G>,
    set: &SetMB,
    pinfo: &PrimInfoMB,
    log_block_size: usize,
) -> SplitMB {
    if set.size() == 0 {
        return SplitMB::Invalid;
    }
    let center_time = pinfo.align_time(set.time_range.center());
    if center_time <= set.time_range.min || center_time >= set.time_range.max {
        return SplitMB::Invalid;
    }
    let time0 = Bounds1f::new(set.time_range.min, center_time);
    let time1 = Bounds1f::new(center_time, set.time_range.max);

    let mut lbounds = LBBox3f::empty();
    let mut rbounds = LBBox3f::empty();
    for prim in set.slice().iter() {
        let (lb, _) = recalc.linear_bounds(prim, &time0);
        lbounds = lbounds.union(&lb);
        let (rb, _) = recalc.linear_bounds(prim, &time1);
        rbounds = rbounds.union(&rb);
    }

    let count = num_blocks(set.size(), log_block_size) as Float;
    let sah = count * lbounds.expected_half_area() * time0.size()
        + count * rbounds.expected_half_area() * time1.size();
    return SplitMB::Temporal {
        sah,
        split_time: center_time,
    };
}

/// Performs a temporal split: allocates two new primitive arrays, one
/// per sub-interval, with every reference recomputed through the
/// geometry back-end. The returned sets have disjoint time ranges and do
/// not share the parent's array.
pub fn split_temporal<G: MotionGeometry>(
    recalc: &RecalculatePrimRef<'_, G>,
    split_time: Float,
    set: &SetMB,
) -> ((PrimInfoMB, SetMB), (PrimInfoMB, SetMB)) {
    let time0 = Bounds1f::new(set.time_range.min, split_time);
    let time1 = Bounds1f::new(split_time, set.time_range.max);

    let mut linfo = PrimInfoMB::empty(&time0);
    let mut lprims = Vec::with_capacity(set.size());
    for prim in set.slice().iter() {
        let (prim2, _) = recalc.recalculate(prim, &time0);
        linfo.add_prim_ref(&prim2);
        lprims.push(prim2);
    }
    let lset = SetMB::from_prims(lprims, &time0);

    let mut rinfo = PrimInfoMB::empty(&time1);
    let mut rprims = Vec::with_capacity(set.size());
    for prim in set.slice().iter() {
        let (prim2, _) = recalc.recalculate(prim, &time1);
        rinfo.add_prim_ref(&prim2);
        rprims.push(prim2);
    }
    let rset = SetMB::from_prims(rprims, &time1);

    return ((linfo, lset), (rinfo, rset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::primref::*;

    /// One primitive per geometry, keyframe boxes interpolated piecewise.
    struct KeyframeScene {
        keyframes: Vec<Vec<Bounds3f>>,
    }

    impl KeyframeScene {
        fn box_at(&self, geom_id: u32, t: Float) -> Bounds3f {
            let frames = &self.keyframes[geom_id as usize];
            let segments = (frames.len() - 1) as Float;
            let s = (t * segments).clamp(0.0, segments);
            let i = (s.floor() as usize).min(frames.len() - 2);
            let f = s - i as Float;
            return LBBox3f::new(&frames[i], &frames[i + 1]).interpolate(f);
        }
    }

    impl MotionGeometry for KeyframeScene {
        fn linear_bounds(&self, geom_id: u32, _prim_id: u32, time_range: &Bounds1f) -> LBBox3f {
            let frames = &self.keyframes[geom_id as usize];
            let mut bounds0 = self.box_at(geom_id, time_range.min);
            let mut bounds1 = self.box_at(geom_id, time_range.max);
            // Conservatively absorb interior keyframes into both endpoints
            for (i, frame) in frames.iter().enumerate() {
                let t = i as Float / (frames.len() - 1) as Float;
                if t > time_range.min && t < time_range.max {
                    bounds0 = bounds0.union(frame);
                    bounds1 = bounds1.union(frame);
                }
            }
            return LBBox3f::new(&bounds0, &bounds1);
        }

        fn num_time_segments(&self, geom_id: u32) -> u32 {
            return (self.keyframes[geom_id as usize].len() - 1) as u32;
        }
    }

    fn unit_box(x: Float) -> Bounds3f {
        Bounds3f::from(((x, 0.0, 0.0), (x + 1.0, 1.0, 1.0)))
    }

    #[test]
    fn test_split_recomputes_both_halves() {
        // One 2-segment primitive moving from x=0 to x=8 and back.
        let scene = KeyframeScene {
            keyframes: vec![vec![unit_box(0.0), unit_box(8.0), unit_box(0.0)]],
        };
        let recalc = RecalculatePrimRef::new(&scene);
        let time_range = Bounds1f::new(0.0, 1.0);
        let seed = PrimRefMB::new(&LBBox3f::empty(), 2, 2, 0, 0);
        let (root, tbounds) = recalc.recalculate(&seed, &time_range);
        assert_eq!(tbounds, SegmentRange::new(0, 2));
        assert_eq!(root.active_time_segments, 2);

        let pinfo = PrimInfoMB::from_prims(&[root], &time_range);
        let set = SetMB::from_prims(vec![root], &time_range);
        let split = find_temporal_split(&recalc, &set, &pinfo, 0);
        let SplitMB::Temporal { split_time, .. } = split else {
            panic!("expected a temporal split, got {:?}", split);
        };
        assert_eq!(split_time, 0.5);

        let ((linfo, lset), (rinfo, rset)) = split_temporal(&recalc, split_time, &set);
        assert_eq!(linfo.size(), 1);
        assert_eq!(rinfo.size(), 1);
        assert!(!lset.same_array(&set));
        assert!(!rset.same_array(&set));
        assert_eq!(lset.time_range, Bounds1f::new(0.0, 0.5));
        assert_eq!(rset.time_range, Bounds1f::new(0.5, 1.0));
        assert_eq!(lset.slice()[0].active_time_segments, 1);
        assert_eq!(rset.slice()[0].active_time_segments, 1);
        // Each half covers one leg of the motion only.
        assert_eq!(lset.slice()[0].lbounds.bounds0, unit_box(0.0));
        assert_eq!(lset.slice()[0].lbounds.bounds1, unit_box(8.0));
        assert_eq!(rset.slice()[0].lbounds.bounds1, unit_box(0.0));
    }

    #[test]
    fn test_degenerate_time_range() {
        let scene = KeyframeScene {
            keyframes: vec![vec![unit_box(0.0), unit_box(1.0)]],
        };
        let recalc = RecalculatePrimRef::new(&scene);
        let time_range = Bounds1f::new(0.0, 1.0);
        let seed = PrimRefMB::new(&LBBox3f::empty(), 1, 1, 0, 0);
        let (root, _) = recalc.recalculate(&seed, &time_range);
        let pinfo = PrimInfoMB::from_prims(&[root], &time_range);
        let set = SetMB::from_prims(vec![root], &time_range);
        // Single segment: the aligned center falls on a range endpoint.
        assert_eq!(find_temporal_split(&recalc, &set, &pinfo, 0), SplitMB::Invalid);
    }
}
