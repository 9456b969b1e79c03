pub mod heuristic_binning;
pub mod heuristic_timesplit;
pub mod msmblur;
pub mod priminfo;
pub mod primref;
pub mod primvec;
pub mod recalc;
pub mod record;
pub mod split;

pub use heuristic_binning::*;
pub use heuristic_timesplit::*;
pub use msmblur::*;
pub use priminfo::*;
pub use primref::*;
pub use primvec::*;
pub use recalc::*;
pub use record::*;
pub use split::*;
