use crate::core::base::*;
use crate::core::error::*;
use crate::core::stats::*;

use super::heuristic_binning::*;
use super::heuristic_timesplit::*;
use super::priminfo::*;
use super::primref::*;
use super::primvec::*;
use super::recalc::*;
use super::record::*;
use super::split::*;

use log::*;
use rayon::prelude::*;

use std::sync::atomic;

/// Maximal supported BVH branching factor.
pub const MAX_BRANCHING_FACTOR: usize = 8;
/// Levels reserved above the depth limit for the balanced large-leaf tree.
pub const MIN_LARGE_LEAF_LEVELS: usize = 8;
/// Subtree size below which the build stays on one thread.
pub const SINGLE_THREADED_THRESHOLD: usize = 1024;

thread_local!(static INTERIOR_NODES: StatCounter = StatCounter::new("BVH/Interior nodes"));
thread_local!(static LEAF_NODES: StatCounter = StatCounter::new("BVH/Leaf nodes"));
thread_local!(static OBJECT_SPLITS: StatCounter = StatCounter::new("BVH/Object splits"));
thread_local!(static TEMPORAL_SPLITS: StatCounter = StatCounter::new("BVH/Temporal splits"));
thread_local!(static FALLBACK_SPLITS: StatCounter = StatCounter::new("BVH/Fallback splits"));

#[derive(Debug, Clone, Copy)]
pub struct BuildSettings {
    pub branching_factor: usize,
    pub max_depth: usize,
    pub log_block_size: usize,
    pub min_leaf_size: usize,
    pub max_leaf_size: usize,
    pub trav_cost: Float,
    pub int_cost: Float,
    pub single_leaf_time_segment: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            branching_factor: 2,
            max_depth: 32,
            log_block_size: 0,
            min_leaf_size: 1,
            max_leaf_size: 8,
            trav_cost: 1.0,
            int_cost: 1.0,
            single_leaf_time_segment: false,
        }
    }
}

/// Capability set through which the builder talks to the outside:
/// node allocation, node/leaf encoding and progress reporting.
pub trait BuildCallbacks: Sync {
    type Alloc;
    type Node: Send;
    type Reduction: Clone + Send + Sync;

    /// Thread-local node allocator handle.
    fn create_alloc(&self) -> Self::Alloc;

    /// Allocates one inner node over the (read-only) child records.
    fn create_node(
        &self,
        parent: &BuildRecordMB,
        children: &[BuildRecordMB],
        alloc: &mut Self::Alloc,
    ) -> Result<Self::Node, BuildError>;

    /// Installs child-derived aggregates and returns the value
    /// propagated to the node's parent.
    fn update_node(
        &self,
        node: Self::Node,
        prims: &SetMB,
        values: &[Self::Reduction],
    ) -> Result<Self::Reduction, BuildError>;

    /// Materialises a leaf over the record's set.
    fn create_leaf(
        &self,
        record: &BuildRecordMB,
        alloc: &mut Self::Alloc,
    ) -> Result<Self::Reduction, BuildError>;

    /// Invoked periodically with the size of finished subtrees; may
    /// raise a fatal error, e.g. when a memory budget is exceeded.
    fn progress_monitor(&self, num_prims: usize) -> Result<(), BuildError>;
}

/// Pending children of one node build. Seeded with the incoming record;
/// `split` replaces a child with its left half and appends the right
/// half. The shared-array bookkeeping rides on the `Arc` clones inside
/// the records: every record holds one reference to its array, replaced
/// or dropped records release theirs, so each array is freed exactly
/// once, right after its last descendant is consumed.
pub struct LocalChildList {
    children: Vec<BuildRecordMB>,
}

impl LocalChildList {
    pub fn new(record: BuildRecordMB) -> Self {
        let mut children = Vec::with_capacity(MAX_BRANCHING_FACTOR);
        children.push(record);
        LocalChildList { children }
    }

    pub fn len(&self) -> usize {
        return self.children.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.children.is_empty();
    }

    pub fn records(&self) -> &[BuildRecordMB] {
        return &self.children;
    }

    pub fn records_mut(&mut self) -> &mut [BuildRecordMB] {
        return &mut self.children;
    }

    pub fn child_mut(&mut self, i: usize) -> &mut BuildRecordMB {
        return &mut self.children[i];
    }

    pub fn split(&mut self, best: usize, lrec: BuildRecordMB, rrec: BuildRecordMB) {
        self.children[best] = lrec;
        self.children.push(rrec);
    }
}

/// Top-down SAH builder for motion-blur BVHs. Inner nodes partition
/// primitives in space (object splits) and, where the cost model says it
/// pays off, in time (temporal splits).
pub struct MSMBlurBuilder<'a, G: MotionGeometry, C: BuildCallbacks> {
    recalc: RecalculatePrimRef<'a, G>,
    callbacks: &'a C,
    identity: C::Reduction,
    settings: BuildSettings,
}

impl<'a, G: MotionGeometry, C: BuildCallbacks> MSMBlurBuilder<'a, G, C> {
    pub fn new(
        recalc: RecalculatePrimRef<'a, G>,
        callbacks: &'a C,
        identity: C::Reduction,
        settings: BuildSettings,
    ) -> Result<Self, BuildError> {
        if settings.branching_factor > MAX_BRANCHING_FACTOR {
            return Err(BuildError::error("bvh_builder: branching factor too large"));
        }
        if settings.branching_factor < 2 {
            return Err(BuildError::error("bvh_builder: branching factor too small"));
        }
        Ok(MSMBlurBuilder {
            recalc,
            callbacks,
            identity,
            settings,
        })
    }

    /// Builder entry: seeds the root split and runs the recursion.
    pub fn build(&self, record: &mut BuildRecordMB) -> Result<C::Reduction, BuildError> {
        debug!(
            "building motion-blur BVH over {} primitives, time range [{}, {}]",
            record.size(),
            record.prims.time_range.min,
            record.prims.time_range.max
        );
        record.split = self.find(record);
        let ret = self.recurse(record, None, true)?;
        // publish non-temporal stores issued by node constructors
        atomic::fence(atomic::Ordering::SeqCst);
        return Ok(ret);
    }

    fn find(&self, record: &BuildRecordMB) -> SplitMB {
        return self.find_split(&record.prims, &record.pinfo);
    }

    /// Best split for a set: the object split, or the temporal split
    /// when the time range is wide enough and its SAH is lower.
    fn find_split(&self, set: &SetMB, pinfo: &PrimInfoMB) -> SplitMB {
        let object_split = find_object_split(set, pinfo, self.settings.log_block_size);

        // Temporal splits are pointless when every included primitive
        // has at most one usable segment in the range.
        if set.time_range.size() > 1.01 / pinfo.max_num_time_segments as Float {
            let temporal_split =
                find_temporal_split(&self.recalc, set, pinfo, self.settings.log_block_size);
            if temporal_split.split_sah() < object_split.split_sah() {
                return temporal_split;
            }
        }
        return object_split;
    }

    /// Fallback split for the large-leaf path. A leaf restricted to a
    /// single time segment cannot hold a primitive spanning several
    /// segments in the leaf's range, so such a primitive forces a
    /// temporal split at the center of its segment range.
    fn find_fallback(&self, current: &BuildRecordMB) -> SplitMB {
        if self.settings.single_leaf_time_segment {
            for prim in current.prims.slice().iter() {
                let itime_range =
                    time_segment_range(&current.pinfo.time_range, prim.total_time_segments);
                assert!(itime_range.size() > 0);
                if itime_range.size() > 1 {
                    let icenter = itime_range.center();
                    let split_time = icenter as Float / prim.total_time_segments as Float;
                    return SplitMB::Temporal {
                        sah: 1.0,
                        split_time,
                    };
                }
            }
        }
        return SplitMB::Fallback;
    }

    /// Midpoint-by-index split; both children share the parent's array
    /// and time range.
    fn split_fallback(
        &self,
        set: &SetMB,
        child_depth: usize,
    ) -> (BuildRecordMB, BuildRecordMB) {
        let begin = set.object_range.start;
        let end = set.object_range.end;
        let center = (begin + end) / 2;
        let time_range = set.time_range;

        let slice = set.slice();
        let linfo = PrimInfoMB::from_prims(&slice[..center - begin], &time_range);
        let rinfo = PrimInfoMB::from_prims(&slice[center - begin..], &time_range);

        let lset = SetMB::new(set.prims.clone(), begin..center, &time_range);
        let rset = SetMB::new(set.prims.clone(), center..end, &time_range);
        return (
            BuildRecordMB::new(child_depth, lset, linfo),
            BuildRecordMB::new(child_depth, rset, rinfo),
        );
    }

    /// Array partitioning for the record's chosen split.
    fn partition(
        &self,
        brecord: &mut BuildRecordMB,
        child_depth: usize,
    ) -> (BuildRecordMB, BuildRecordMB) {
        match brecord.split {
            SplitMB::Fallback | SplitMB::Invalid => {
                FALLBACK_SPLITS.with(|c| c.inc());
                brecord.prims.deterministic_order();
                return self.split_fallback(&brecord.prims, child_depth);
            }
            SplitMB::Temporal { split_time, .. } => {
                TEMPORAL_SPLITS.with(|c| c.inc());
                let ((linfo, lset), (rinfo, rset)) =
                    split_temporal(&self.recalc, split_time, &brecord.prims);
                return (
                    BuildRecordMB::new(child_depth, lset, linfo),
                    BuildRecordMB::new(child_depth, rset, rinfo),
                );
            }
            SplitMB::Object { dim, pos, .. } => {
                OBJECT_SPLITS.with(|c| c.inc());
                let ((linfo, lset), (rinfo, rset)) =
                    split_object(dim, pos, &brecord.pinfo, &mut brecord.prims);
                return (
                    BuildRecordMB::new(child_depth, lset, linfo),
                    BuildRecordMB::new(child_depth, rset, rinfo),
                );
            }
        }
    }

    /// Turns an oversized leaf region into a bounded-fanout subtree
    /// using only fallback splits, still honouring forced temporal
    /// splits when leaves are restricted to one time segment.
    fn create_large_leaf(
        &self,
        current: &mut BuildRecordMB,
        alloc: &mut C::Alloc,
    ) -> Result<C::Reduction, BuildError> {
        // this should never occur but is a fatal error
        if current.depth > self.settings.max_depth {
            return Err(BuildError::error("bvh_builder: depth limit reached"));
        }

        // replace the already found split by a fallback split
        current.split = self.find_fallback(current);

        if current.size() <= self.settings.max_leaf_size && !current.split.is_temporal() {
            LEAF_NODES.with(|c| c.inc());
            return self.callbacks.create_leaf(current, alloc);
        }

        // fill all children by always splitting the largest one
        let child_depth = current.depth + 1;
        let mut children = LocalChildList::new(current.clone());
        loop {
            let mut best_child: Option<usize> = None;
            let mut best_size = 0;
            for (i, child) in children.records().iter().enumerate() {
                // ignore children that can become leaves as they are
                if child.size() <= self.settings.max_leaf_size && !child.split.is_temporal() {
                    continue;
                }
                if child.size() > best_size {
                    best_size = child.size();
                    best_child = Some(i);
                }
            }
            let Some(best) = best_child else {
                break;
            };

            let (mut lrec, mut rrec) = self.partition(children.child_mut(best), child_depth);
            lrec.split = self.find_fallback(&lrec);
            rrec.split = self.find_fallback(&rrec);
            children.split(best, lrec, rrec);
            if children.len() >= self.settings.branching_factor {
                break;
            }
        }

        INTERIOR_NODES.with(|c| c.inc());
        let node = self
            .callbacks
            .create_node(current, children.records(), alloc)?;

        // recurse into each child and perform the reduction
        let mut values = Vec::with_capacity(children.len());
        for i in 0..children.len() {
            let value = self.create_large_leaf(children.child_mut(i), alloc)?;
            values.push(value);
        }
        return self.callbacks.update_node(node, &current.prims, &values);
    }

    fn recurse(
        &self,
        current: &mut BuildRecordMB,
        alloc: Option<&mut C::Alloc>,
        toplevel: bool,
    ) -> Result<C::Reduction, BuildError> {
        let mut local_alloc;
        let alloc = match alloc {
            Some(alloc) => alloc,
            None => {
                local_alloc = self.callbacks.create_alloc();
                &mut local_alloc
            }
        };

        // signal progress on every finished top-level subtree
        if toplevel && current.size() <= SINGLE_THREADED_THRESHOLD {
            self.callbacks.progress_monitor(current.size())?;
        }

        debug_assert_eq!(current.size(), current.prims.size());
        let leaf_sah =
            self.settings.int_cost * current.pinfo.leaf_sah(self.settings.log_block_size);
        let split_sah = self.settings.trav_cost * current.pinfo.half_area()
            + self.settings.int_cost * current.split.split_sah();

        // create a leaf when the threshold is reached or SAH says to stop
        if current.size() <= self.settings.min_leaf_size
            || current.depth + MIN_LARGE_LEAF_LEVELS >= self.settings.max_depth
            || (current.size() <= self.settings.max_leaf_size && leaf_sah <= split_sah)
        {
            current.prims.deterministic_order();
            return self.create_large_leaf(current, alloc);
        }

        // split until the node is full or no child profits from a split
        let child_depth = current.depth + 1;
        let mut children = LocalChildList::new(current.clone());
        loop {
            let mut best_child: Option<usize> = None;
            let mut best_area = Float::NEG_INFINITY;
            for (i, child) in children.records().iter().enumerate() {
                if child.size() <= self.settings.min_leaf_size {
                    continue;
                }
                let area = child.pinfo.geom_bounds.half_area();
                if area > best_area {
                    best_area = area;
                    best_child = Some(i);
                }
            }
            let Some(best) = best_child else {
                break;
            };

            let (mut lrec, mut rrec) = self.partition(children.child_mut(best), child_depth);
            lrec.split = self.find(&lrec);
            rrec.split = self.find(&rrec);
            children.split(best, lrec, rrec);
            if children.len() >= self.settings.branching_factor {
                break;
            }
        }

        INTERIOR_NODES.with(|c| c.inc());
        let node = self
            .callbacks
            .create_node(current, children.records(), alloc)?;

        let n = children.len();
        let mut values = vec![self.identity.clone(); n];
        if current.size() > SINGLE_THREADED_THRESHOLD {
            // children are sized comparably, a parallel_for across the
            // siblings balances well
            children
                .records_mut()
                .par_iter_mut()
                .zip(values.par_iter_mut())
                .try_for_each(|(child, value)| -> Result<(), BuildError> {
                    *value = self.recurse(child, None, true)?;
                    // publish non-temporal stores from node constructors
                    atomic::fence(atomic::Ordering::SeqCst);
                    Ok(())
                })?;
        } else {
            // small subproblem: stay on this thread and reuse its
            // allocator for locality
            for i in (0..n).rev() {
                values[i] = self.recurse(children.child_mut(i), Some(&mut *alloc), false)?;
            }
        }
        return self.callbacks.update_node(node, &current.prims, &values);
    }
}
