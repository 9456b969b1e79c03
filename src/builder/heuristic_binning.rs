use crate::core::base::*;
use crate::core::geometry::*;

use super::priminfo::*;
use super::primref::*;
use super::primvec::*;
use super::split::*;

const N_BUCKETS: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
struct BucketInfoMB {
    count: usize,
    lbounds: LBBox3f,
}

fn bucket_index(center: &Vector3f, cent_bounds: &Bounds3f, dim: usize) -> usize {
    let b = (Float::floor(N_BUCKETS as Float * cent_bounds.offset(center)[dim]) as i32)
        .min(N_BUCKETS as i32 - 1)
        .max(0) as usize;
    return b;
}

/// Finds the best object split: bin centroids along the widest centroid
/// axis and sweep the bucket boundaries for the lowest SAH. Returns
/// `Invalid` when the set cannot be usefully partitioned (no centroid
/// spread, or every primitive in one bucket).
pub fn find_object_split(set: &SetMB, pinfo: &PrimInfoMB, log_block_size: usize) -> SplitMB {
    if pinfo.size() == 0 {
        return SplitMB::Invalid;
    }
    let dim = pinfo.cent_bounds.maximum_extent();
    if pinfo.cent_bounds.min[dim] == pinfo.cent_bounds.max[dim] {
        return SplitMB::Invalid;
    }

    // Initialize buckets with counts and linear-bounds unions
    let mut buckets = [BucketInfoMB::default(); N_BUCKETS];
    for prim in set.slice().iter() {
        let b = bucket_index(&prim.center(), &pinfo.cent_bounds, dim);
        buckets[b].count += 1;
        buckets[b].lbounds = buckets[b].lbounds.union(&prim.lbounds);
    }

    // Sweep from the right to collect suffix areas and counts
    let mut right_area = [0.0 as Float; N_BUCKETS];
    let mut right_count = [0usize; N_BUCKETS];
    let mut accum = LBBox3f::empty();
    let mut count = 0;
    for i in (1..N_BUCKETS).rev() {
        accum = accum.union(&buckets[i].lbounds);
        count += buckets[i].count;
        right_area[i] = accum.expected_half_area();
        right_count[i] = count;
    }

    // Sweep from the left and keep the cheapest boundary
    let dt = set.time_range.size();
    let mut best_sah = Float::INFINITY;
    let mut best_pos = 0;
    let mut accum = LBBox3f::empty();
    let mut count = 0;
    for i in 1..N_BUCKETS {
        accum = accum.union(&buckets[i - 1].lbounds);
        count += buckets[i - 1].count;
        if count == 0 || right_count[i] == 0 {
            continue;
        }
        let sah = accum.expected_half_area() * num_blocks(count, log_block_size) as Float * dt
            + right_area[i] * num_blocks(right_count[i], log_block_size) as Float * dt;
        if sah < best_sah {
            best_sah = sah;
            best_pos = i;
        }
    }
    if best_pos == 0 {
        return SplitMB::Invalid;
    }
    return SplitMB::Object {
        sah: best_sah,
        dim,
        pos: best_pos,
    };
}

/// Partitions the set's range of the shared array in place with the
/// bucket mapping chosen by `find_object_split`. Both children share the
/// parent's array and time range.
pub fn split_object(
    dim: usize,
    pos: usize,
    pinfo: &PrimInfoMB,
    set: &mut SetMB,
) -> ((PrimInfoMB, SetMB), (PrimInfoMB, SetMB)) {
    let begin = set.object_range.start;
    let end = set.object_range.end;
    let time_range = set.time_range;

    let mut linfo = PrimInfoMB::empty(&time_range);
    let mut rinfo = PrimInfoMB::empty(&time_range);
    {
        let slice = set.slice_mut();
        let (left, right): (Vec<PrimRefMB>, Vec<PrimRefMB>) = slice
            .iter()
            .partition(|prim| bucket_index(&prim.center(), &pinfo.cent_bounds, dim) < pos);
        for (i, prim) in left.iter().enumerate() {
            linfo.add_prim_ref(prim);
            slice[i] = *prim;
        }
        for (i, prim) in right.iter().enumerate() {
            rinfo.add_prim_ref(prim);
            slice[left.len() + i] = *prim;
        }
    }

    let center = begin + linfo.size();
    let lset = SetMB::new(set.prims.clone(), begin..center, &time_range);
    let rset = SetMB::new(set.prims.clone(), center..end, &time_range);
    return ((linfo, lset), (rinfo, rset));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(id: u32, x: Float) -> PrimRefMB {
        let b = Bounds3f::from(((x, 0.0, 0.0), (x + 1.0, 1.0, 1.0)));
        PrimRefMB::new(&LBBox3f::from(b), 1, 1, 0, id)
    }

    fn set_and_info(prims: Vec<PrimRefMB>) -> (SetMB, PrimInfoMB) {
        let time_range = Bounds1f::new(0.0, 1.0);
        let pinfo = PrimInfoMB::from_prims(&prims, &time_range);
        (SetMB::from_prims(prims, &time_range), pinfo)
    }

    #[test]
    fn test_find_separates_two_clusters() {
        let mut prims = Vec::new();
        for i in 0..4 {
            prims.push(prim(i, i as Float * 0.1));
        }
        for i in 4..8 {
            prims.push(prim(i, 100.0 + i as Float * 0.1));
        }
        let (set, pinfo) = set_and_info(prims);
        let split = find_object_split(&set, &pinfo, 0);
        match split {
            SplitMB::Object { dim, .. } => assert_eq!(dim, 0),
            _ => panic!("expected an object split, got {:?}", split),
        }
    }

    #[test]
    fn test_find_degenerate_centroids() {
        let prims = vec![prim(0, 5.0), prim(1, 5.0), prim(2, 5.0)];
        let (set, pinfo) = set_and_info(prims);
        assert_eq!(find_object_split(&set, &pinfo, 0), SplitMB::Invalid);
    }

    #[test]
    fn test_split_partitions_in_place() {
        let mut prims = Vec::new();
        for i in 0..4 {
            prims.push(prim(i, i as Float * 0.1));
        }
        for i in 4..8 {
            prims.push(prim(i, 100.0 + i as Float * 0.1));
        }
        let (mut set, pinfo) = set_and_info(prims);
        let split = find_object_split(&set, &pinfo, 0);
        let SplitMB::Object { dim, pos, .. } = split else {
            panic!("expected an object split");
        };
        let ((linfo, lset), (rinfo, rset)) = split_object(dim, pos, &pinfo, &mut set);
        assert_eq!(linfo.size() + rinfo.size(), 8);
        assert_eq!(linfo.size(), 4);
        assert!(lset.same_array(&rset));
        assert_eq!(lset.object_range, 0..4);
        assert_eq!(rset.object_range, 4..8);
        for p in lset.slice().iter() {
            assert!(p.prim_id < 4);
        }
        for p in rset.slice().iter() {
            assert!(p.prim_id >= 4);
        }
    }
}
