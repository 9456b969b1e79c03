use std::cell::UnsafeCell;
use std::ops::Range;
use std::sync::Arc;

use crate::core::geometry::*;

use super::primref::*;

/// Primitive array shared between build records as `Arc<PrimVecMB>`.
///
/// The `Arc` strong count is the array's reference count: cloning a set
/// acquires a reference, dropping it releases one, and the last drop
/// frees the array. Object splits hand the same array to both children
/// (disjoint index ranges); temporal splits allocate fresh arrays.
///
/// The length is fixed at construction; builds only permute elements.
/// Mutable access goes through `SetMB`, under the invariant that the
/// object ranges of all live build records on one array are pairwise
/// disjoint, so concurrently built siblings never touch the same
/// elements.
pub struct PrimVecMB {
    data: UnsafeCell<Box<[PrimRefMB]>>,
}

// SAFETY: see the range-disjointness invariant above; every access is a
// slice of the owning record's object range.
unsafe impl Sync for PrimVecMB {}

impl PrimVecMB {
    pub fn new(prims: Vec<PrimRefMB>) -> Self {
        PrimVecMB {
            data: UnsafeCell::new(prims.into_boxed_slice()),
        }
    }

    pub fn len(&self) -> usize {
        unsafe { (&*self.data.get()).len() }
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// SAFETY: the caller must be the live record owning `range`.
    pub(crate) unsafe fn range(&self, range: &Range<usize>) -> &[PrimRefMB] {
        &(&*self.data.get())[range.clone()]
    }

    /// SAFETY: the caller must be the live record owning `range`; no
    /// other slice of an overlapping range may exist.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn range_mut(&self, range: &Range<usize>) -> &mut [PrimRefMB] {
        &mut (&mut *self.data.get())[range.clone()]
    }
}

/// View of a build record into a shared primitive array: an index range
/// plus the time range its linear bounds were computed over.
#[derive(Clone)]
pub struct SetMB {
    pub prims: Arc<PrimVecMB>,
    pub object_range: Range<usize>,
    pub time_range: Bounds1f,
}

impl SetMB {
    pub fn new(prims: Arc<PrimVecMB>, object_range: Range<usize>, time_range: &Bounds1f) -> Self {
        assert!(object_range.start <= object_range.end);
        assert!(object_range.end <= prims.len());
        SetMB {
            prims,
            object_range,
            time_range: *time_range,
        }
    }

    pub fn from_prims(prims: Vec<PrimRefMB>, time_range: &Bounds1f) -> Self {
        let n = prims.len();
        return SetMB::new(Arc::new(PrimVecMB::new(prims)), 0..n, time_range);
    }

    pub fn size(&self) -> usize {
        return self.object_range.end - self.object_range.start;
    }

    pub fn slice(&self) -> &[PrimRefMB] {
        // This record is the only live owner of its range.
        unsafe { self.prims.range(&self.object_range) }
    }

    pub fn slice_mut(&mut self) -> &mut [PrimRefMB] {
        // This record is the only live owner of its range.
        unsafe { self.prims.range_mut(&self.object_range) }
    }

    pub fn same_array(&self, other: &SetMB) -> bool {
        return Arc::ptr_eq(&self.prims, &other.prims);
    }

    /// Restores the content-derived total order. Required before
    /// fallback splits and leaf emission so repeated builds produce
    /// identical trees.
    pub fn deterministic_order(&mut self) {
        self.slice_mut().sort_unstable_by_key(PrimRefMB::sort_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base::*;

    fn prim(id: u32, x: Float) -> PrimRefMB {
        let b = Bounds3f::from(((x, 0.0, 0.0), (x + 1.0, 1.0, 1.0)));
        PrimRefMB::new(&LBBox3f::from(b), 1, 1, 0, id)
    }

    #[test]
    fn test_sharing() {
        let time_range = Bounds1f::new(0.0, 1.0);
        let set = SetMB::from_prims(vec![prim(0, 0.0), prim(1, 2.0)], &time_range);
        assert_eq!(Arc::strong_count(&set.prims), 1);
        let left = SetMB::new(set.prims.clone(), 0..1, &time_range);
        let right = SetMB::new(set.prims.clone(), 1..2, &time_range);
        assert_eq!(Arc::strong_count(&set.prims), 3);
        assert!(left.same_array(&right));
        drop(left);
        drop(right);
        assert_eq!(Arc::strong_count(&set.prims), 1);
    }

    #[test]
    fn test_deterministic_order() {
        let time_range = Bounds1f::new(0.0, 1.0);
        let mut set = SetMB::from_prims(
            vec![prim(3, 0.0), prim(0, 1.0), prim(2, 2.0), prim(1, 3.0)],
            &time_range,
        );
        set.deterministic_order();
        let ids: Vec<u32> = set.slice().iter().map(|p| p.prim_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_subrange_slices() {
        let time_range = Bounds1f::new(0.0, 1.0);
        let set = SetMB::from_prims(vec![prim(0, 0.0), prim(1, 2.0), prim(2, 4.0)], &time_range);
        let mut mid = SetMB::new(set.prims.clone(), 1..2, &time_range);
        assert_eq!(mid.size(), 1);
        assert_eq!(mid.slice()[0].prim_id, 1);
        mid.slice_mut()[0].geom_id = 7;
        assert_eq!(set.slice()[1].geom_id, 7);
    }
}
