//! Reduction of an ensemble of delta records to one entropy per residue.
//!
//! Records are grouped by reference residue position; each group's phi and
//! psi deltas are reduced independently with [`binned_entropy`]. Only
//! positions present in the input appear in the output, so downstream merges
//! against a full residue list must expect gaps.

use std::collections::BTreeMap;

use dihedra_core::Result;
use log::{debug, warn};

use crate::delta::ResidueDelta;
use crate::entropy::{binned_entropy, Binning, EntropyValue, InvalidPolicy};

/// Histogram layout plus invalid-value policy for one analysis run.
///
/// Every residue of a run must use the same options for the entropies to be
/// comparable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntropyOptions {
    pub binning: Binning,
    pub on_invalid: InvalidPolicy,
}

/// All deltas observed for one reference residue across an ensemble.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResidueDeltaGroup {
    pub ref_residue_position: i32,
    pub delta_phi: Vec<f64>,
    pub delta_psi: Vec<f64>,
}

/// Entropy of the phi and psi deltas of one reference residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyRecord {
    pub ref_residue_position: i32,
    pub phi_entropy: EntropyValue,
    pub psi_entropy: EntropyValue,
}

/// Group records by reference residue position, sorted by position.
///
/// Input order does not matter.
pub fn group_deltas<R: ResidueDelta>(records: &[R]) -> Vec<ResidueDeltaGroup> {
    let mut groups: BTreeMap<i32, ResidueDeltaGroup> = BTreeMap::new();
    for r in records {
        let position = r.ref_residue_position();
        let g = groups.entry(position).or_insert_with(|| ResidueDeltaGroup {
            ref_residue_position: position,
            ..Default::default()
        });
        g.delta_phi.push(r.delta_phi());
        g.delta_psi.push(r.delta_psi());
    }
    groups.into_values().collect()
}

/// Reduce one residue group.
pub fn group_entropy(group: &ResidueDeltaGroup, options: &EntropyOptions) -> Result<EntropyRecord> {
    let phi_entropy = binned_entropy(&group.delta_phi, &options.binning, options.on_invalid)?;
    let psi_entropy = binned_entropy(&group.delta_psi, &options.binning, options.on_invalid)?;
    if !phi_entropy.is_defined() || !psi_entropy.is_defined() {
        warn!(
            "residue {}: no usable deltas (phi {}, psi {})",
            group.ref_residue_position, phi_entropy, psi_entropy
        );
    }
    Ok(EntropyRecord {
        ref_residue_position: group.ref_residue_position,
        phi_entropy,
        psi_entropy,
    })
}

/// Compute one [`EntropyRecord`] per distinct reference residue in `records`,
/// sorted by residue position.
///
/// # Errors
///
/// Returns an error if the binning is invalid, or if the policy is
/// [`InvalidPolicy::Fail`] and any group holds a non-finite delta.
pub fn reduce_entropy<R: ResidueDelta>(
    records: &[R],
    options: &EntropyOptions,
) -> Result<Vec<EntropyRecord>> {
    options.binning.validate()?;
    let groups = group_deltas(records);
    debug!(
        "reducing {} delta record(s) in {} residue group(s)",
        records.len(),
        groups.len()
    );
    reduce_groups(&groups, options)
}

#[cfg(not(feature = "parallel"))]
fn reduce_groups(groups: &[ResidueDeltaGroup], options: &EntropyOptions) -> Result<Vec<EntropyRecord>> {
    groups.iter().map(|g| group_entropy(g, options)).collect()
}

#[cfg(feature = "parallel")]
fn reduce_groups(groups: &[ResidueDeltaGroup], options: &EntropyOptions) -> Result<Vec<EntropyRecord>> {
    use rayon::prelude::*;

    groups.par_iter().map(|g| group_entropy(g, options)).collect()
}
