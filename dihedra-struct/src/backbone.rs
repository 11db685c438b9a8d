//! Backbone phi/psi torsion angles.

use dihedra_core::AnglePair;

use crate::geometry::dihedral_points;
use crate::types::{Chain, Residue, Structure};

/// Compute backbone phi and psi dihedral angles for a residue.
///
/// phi is C(i-1)-N(i)-CA(i)-C(i); psi is N(i)-CA(i)-C(i)-N(i+1).
/// Returns `None` when either neighbour is absent or any of the six
/// atoms is missing.
pub fn backbone_dihedrals(
    prev: Option<&Residue>,
    curr: &Residue,
    next: Option<&Residue>,
) -> Option<(f64, f64)> {
    let c_prev = prev?.get_atom("C")?;
    let n = curr.get_atom("N")?;
    let ca = curr.get_atom("CA")?;
    let c = curr.get_atom("C")?;
    let n_next = next?.get_atom("N")?;

    let phi = dihedral_points(&c_prev.coords, &n.coords, &ca.coords, &c.coords);
    let psi = dihedral_points(&n.coords, &ca.coords, &c.coords, &n_next.coords);
    Some((phi, psi))
}

/// phi/psi for every standard amino acid of a chain that has both angles.
///
/// Neighbours are the adjacent residues in file order, whatever their kind;
/// residues without a defined phi or psi are left out.
pub fn chain_angles(chain: &Chain) -> Vec<AnglePair> {
    let residues = &chain.residues;
    let mut out = Vec::new();
    for (i, res) in residues.iter().enumerate() {
        let Some(code) = res.one_letter_code() else {
            continue;
        };
        let prev = i.checked_sub(1).map(|j| &residues[j]);
        let next = residues.get(i + 1);
        if let Some((phi, psi)) = backbone_dihedrals(prev, res, next) {
            out.push(AnglePair::new(res.seq_num, code, phi, psi));
        }
    }
    out
}

/// phi/psi for every chain of a structure, chains in file order.
pub fn structure_angles(structure: &Structure) -> Vec<AnglePair> {
    structure.chains.iter().flat_map(chain_angles).collect()
}
