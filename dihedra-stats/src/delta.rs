//! Per-residue angular deltas between a reference and a target structure.

use dihedra_core::{index_angles, AnglePair, ResidueAlignment};

use crate::circular::circular_delta;

/// Backbone angle change of one aligned residue in one structure pair.
///
/// `delta_phi` and `delta_psi` are minimal circular distances in `[0, 180]`,
/// or NaN when read back from a table with unusable cells.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaRecord {
    #[cfg_attr(feature = "serde", serde(rename = "RefResidueNumber"))]
    pub ref_residue_position: i32,
    #[cfg_attr(feature = "serde", serde(rename = "TargetResidueNumber"))]
    pub target_residue_position: i32,
    #[cfg_attr(feature = "serde", serde(rename = "DeltaPhi"))]
    pub delta_phi: f64,
    #[cfg_attr(feature = "serde", serde(rename = "DeltaPsi"))]
    pub delta_psi: f64,
}

/// A per-residue delta observation that can be grouped for reduction.
///
/// Implemented by [`DeltaRecord`] and by table rows that no longer carry the
/// target residue (aggregated ensembles).
pub trait ResidueDelta {
    fn ref_residue_position(&self) -> i32;
    fn delta_phi(&self) -> f64;
    fn delta_psi(&self) -> f64;
}

impl ResidueDelta for DeltaRecord {
    fn ref_residue_position(&self) -> i32 {
        self.ref_residue_position
    }

    fn delta_phi(&self) -> f64 {
        self.delta_phi
    }

    fn delta_psi(&self) -> f64 {
        self.delta_psi
    }
}

impl DeltaRecord {
    /// Compare two residues' backbone angles.
    pub fn between(reference: &AnglePair, target: &AnglePair) -> Self {
        Self {
            ref_residue_position: reference.residue_position,
            target_residue_position: target.residue_position,
            delta_phi: circular_delta(reference.phi, target.phi),
            delta_psi: circular_delta(reference.psi, target.psi),
        }
    }
}

/// Compute one [`DeltaRecord`] per aligned residue for which both structures
/// have backbone angles. Records follow the alignment's order.
pub fn compute_deltas(
    alignment: &ResidueAlignment,
    reference: &[AnglePair],
    target: &[AnglePair],
) -> Vec<DeltaRecord> {
    let ref_index = index_angles(reference);
    let target_index = index_angles(target);

    alignment
        .pairs()
        .iter()
        .filter_map(|(r, t)| {
            let ra = ref_index.get(r)?;
            let ta = target_index.get(t)?;
            Some(DeltaRecord::between(ra, ta))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(rows: &[(i32, f64, f64)]) -> Vec<AnglePair> {
        rows.iter()
            .map(|&(n, phi, psi)| AnglePair::new(n, 'A', phi, psi))
            .collect()
    }

    #[test]
    fn deltas_for_mapped_residues_only() {
        let reference = angles(&[(1, -60.0, -45.0), (2, -120.0, 130.0), (3, 170.0, 0.0)]);
        let target = angles(&[(11, -65.0, -40.0), (13, -170.0, 10.0)]);
        let aln = ResidueAlignment::from_pairs([(1, 11), (2, 12), (3, 13)]).unwrap();

        let deltas = compute_deltas(&aln, &reference, &target);
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].ref_residue_position, 1);
        assert_eq!(deltas[0].target_residue_position, 11);
        assert!((deltas[0].delta_phi - 5.0).abs() < 1e-10);
        assert!((deltas[0].delta_psi - 5.0).abs() < 1e-10);
        // 170 vs -170 wraps to 20
        assert_eq!(deltas[1].ref_residue_position, 3);
        assert!((deltas[1].delta_phi - 20.0).abs() < 1e-10);
        assert!((deltas[1].delta_psi - 10.0).abs() < 1e-10);
    }

    #[test]
    fn empty_alignment_gives_no_deltas() {
        let reference = angles(&[(1, 0.0, 0.0)]);
        assert!(compute_deltas(&ResidueAlignment::new(), &reference, &reference).is_empty());
    }

    #[test]
    fn deltas_are_capped_at_180() {
        let reference = angles(&[(1, 90.0, -90.0)]);
        let target = angles(&[(1, -90.0, 90.0)]);
        let aln = ResidueAlignment::from_pairs([(1, 1)]).unwrap();
        let d = compute_deltas(&aln, &reference, &target);
        assert_eq!(d[0].delta_phi, 180.0);
        assert_eq!(d[0].delta_psi, 180.0);
    }
}
