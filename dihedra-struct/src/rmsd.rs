//! Per-residue CA deviation across the models of an ensemble.

use crate::geometry::rmsd_points;
use crate::types::{Point3D, Structure};

use std::collections::BTreeMap;

/// CA deviations of one reference residue against every other model.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueRmsd {
    pub residue_number: i32,
    /// Three-letter name in the reference model.
    pub residue_name: String,
    /// One entry per non-reference model, in model order; `None` when the
    /// model lacks this residue's CA.
    pub per_model: Vec<Option<f64>>,
}

impl ResidueRmsd {
    /// Mean over the models that have a value.
    pub fn mean(&self) -> Option<f64> {
        let values: Vec<f64> = self.per_model.iter().flatten().copied().collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Per-residue CA RMSD table for an ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleRmsd {
    /// Serial numbers of the compared (non-reference) models.
    pub models: Vec<u32>,
    /// Rows sorted by residue number.
    pub residues: Vec<ResidueRmsd>,
}

/// Compare every model against the first, residue by residue.
///
/// Residues are matched by sequence number across all chains. With a
/// single CA per residue the RMSD reduces to the CA displacement, since
/// no superposition is applied. Residues with no value in any model are
/// omitted; fewer than two models yields an empty table.
pub fn per_residue_ca_rmsd(models: &[Structure]) -> EnsembleRmsd {
    let Some((reference, others)) = models.split_first() else {
        return EnsembleRmsd {
            models: Vec::new(),
            residues: Vec::new(),
        };
    };

    let ref_cas = ca_positions(reference);
    let other_cas: Vec<BTreeMap<i32, (String, Point3D)>> = others.iter().map(ca_positions).collect();

    let residues = ref_cas
        .iter()
        .filter_map(|(&num, (name, ref_ca))| {
            let per_model: Vec<Option<f64>> = other_cas
                .iter()
                .map(|m| {
                    m.get(&num).and_then(|(_, ca)| {
                        rmsd_points(std::slice::from_ref(ref_ca), std::slice::from_ref(ca)).ok()
                    })
                })
                .collect();
            per_model.iter().any(Option::is_some).then(|| ResidueRmsd {
                residue_number: num,
                residue_name: name.clone(),
                per_model,
            })
        })
        .collect();

    EnsembleRmsd {
        models: others.iter().map(|s| s.model).collect(),
        residues,
    }
}

/// First CA of each residue number in the model.
fn ca_positions(structure: &Structure) -> BTreeMap<i32, (String, Point3D)> {
    let mut map = BTreeMap::new();
    for chain in &structure.chains {
        for residue in &chain.residues {
            if let Some(ca) = residue.get_alpha_carbon() {
                map.entry(residue.seq_num)
                    .or_insert_with(|| (residue.name.clone(), ca.coords));
            }
        }
    }
    map
}
