use crate::core::geometry::*;

use super::priminfo::*;
use super::primref::*;
use super::primvec::*;
use super::split::*;

/// Unit of recursion: a primitive set with its statistics and the split
/// chosen for it. Cloning shares the underlying primitive array.
#[derive(Clone)]
pub struct BuildRecordMB {
    pub depth: usize,
    pub prims: SetMB,
    pub pinfo: PrimInfoMB,
    pub split: SplitMB,
}

impl BuildRecordMB {
    pub fn new(depth: usize, prims: SetMB, pinfo: PrimInfoMB) -> Self {
        BuildRecordMB {
            depth,
            prims,
            pinfo,
            split: SplitMB::Invalid,
        }
    }

    /// Root record over a freshly allocated primitive array.
    pub fn from_prims(prims: Vec<PrimRefMB>, time_range: &Bounds1f) -> Self {
        let pinfo = PrimInfoMB::from_prims(&prims, time_range);
        let set = SetMB::from_prims(prims, time_range);
        return BuildRecordMB::new(0, set, pinfo);
    }

    pub fn size(&self) -> usize {
        return self.pinfo.size();
    }
}
