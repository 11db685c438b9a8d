//! Circular statistics and entropy estimation for backbone variability.
//!
//! - **Circular deltas**: minimal angular separation in [`circular`]
//! - **Binned entropy**: fixed-range histogram Shannon entropy in [`entropy`]
//! - **Delta records**: aligned residue comparisons in [`delta`]
//! - **Reduction**: per-residue entropy across an ensemble in [`reduction`]
//! - **Family cutoffs**: configurable residue limits in [`cutoff`]

pub mod circular;
pub mod cutoff;
pub mod delta;
pub mod entropy;
pub mod reduction;

pub use circular::circular_delta;
pub use cutoff::FamilyCutoffs;
pub use delta::{compute_deltas, DeltaRecord, ResidueDelta};
pub use entropy::{binned_entropy, histogram_entropy, Binning, EntropyValue, InvalidPolicy};
pub use reduction::{group_deltas, reduce_entropy, EntropyOptions, EntropyRecord, ResidueDeltaGroup};
