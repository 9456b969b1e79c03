use crate::core::base::*;

/// Chosen split for a build record. `Fallback` is the midpoint-by-index
/// split; `Invalid` marks a failed heuristic search and partitions the
/// same way.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum SplitMB {
    /// Partition on a spatial axis at a binning position; shares the
    /// primitive array with the parent.
    Object { sah: Float, dim: usize, pos: usize },
    /// Partition the time range in two; replicates the primitives into
    /// two freshly allocated arrays.
    Temporal { sah: Float, split_time: Float },
    Fallback,
    Invalid,
}

impl SplitMB {
    pub fn split_sah(&self) -> Float {
        match self {
            SplitMB::Object { sah, .. } => *sah,
            SplitMB::Temporal { sah, .. } => *sah,
            SplitMB::Fallback | SplitMB::Invalid => Float::INFINITY,
        }
    }

    pub fn is_temporal(&self) -> bool {
        return matches!(self, SplitMB::Temporal { .. });
    }
}
