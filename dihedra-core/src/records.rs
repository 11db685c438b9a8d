//! Residue-level records shared by every stage of the variability pipeline.
//!
//! [`AnglePair`] tables come out of backbone dihedral extraction, and
//! [`ResidueAlignment`] maps reference residues onto target residues for one
//! structure pair. Both are consumed read-only by the delta and entropy code.

use std::collections::HashMap;

use crate::{DihedraError, Result};

/// Backbone dihedral angles of one residue, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnglePair {
    /// Residue sequence number as written in the coordinate file.
    #[cfg_attr(feature = "serde", serde(rename = "ResidueNumber"))]
    pub residue_position: i32,
    /// One-letter amino acid code.
    #[cfg_attr(feature = "serde", serde(rename = "ResidueName"))]
    pub residue_name: char,
    #[cfg_attr(feature = "serde", serde(rename = "Phi"))]
    pub phi: f64,
    #[cfg_attr(feature = "serde", serde(rename = "Psi"))]
    pub psi: f64,
}

impl AnglePair {
    pub fn new(residue_position: i32, residue_name: char, phi: f64, psi: f64) -> Self {
        Self {
            residue_position,
            residue_name,
            phi,
            psi,
        }
    }
}

/// Index an angle table by residue position.
///
/// When a position occurs twice (insertion codes), the first occurrence wins.
pub fn index_angles(angles: &[AnglePair]) -> HashMap<i32, &AnglePair> {
    let mut index = HashMap::with_capacity(angles.len());
    for a in angles {
        index.entry(a.residue_position).or_insert(a);
    }
    index
}

/// One-to-one mapping from reference residue positions to target residue
/// positions for a single structure pair.
///
/// Pairs keep insertion order. Neither side may repeat: a reference residue
/// maps to at most one target and no two reference residues share a target.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<(i32, i32)>", into = "Vec<(i32, i32)>")
)]
pub struct ResidueAlignment {
    pairs: Vec<(i32, i32)>,
    // reference -> target and target -> reference, kept in step with `pairs`
    forward: HashMap<i32, i32>,
    backward: HashMap<i32, i32>,
}

impl ResidueAlignment {
    /// An empty alignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an alignment from `(reference, target)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if either side repeats a position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, i32)>) -> Result<Self> {
        let mut alignment = Self::new();
        for (r, t) in pairs {
            alignment.push(r, t)?;
        }
        Ok(alignment)
    }

    /// Append a mapping. On error the alignment is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `reference` is already mapped or `target` is
    /// already the image of another reference residue.
    pub fn push(&mut self, reference: i32, target: i32) -> Result<()> {
        if let Some(t) = self.forward.get(&reference) {
            return Err(DihedraError::InvalidInput(format!(
                "reference residue {} already mapped to {}",
                reference, t
            )));
        }
        if let Some(r) = self.backward.get(&target) {
            return Err(DihedraError::InvalidInput(format!(
                "target residue {} already mapped from {}",
                target, r
            )));
        }
        self.forward.insert(reference, target);
        self.backward.insert(target, reference);
        self.pairs.push((reference, target));
        Ok(())
    }

    /// All `(reference, target)` pairs in insertion order.
    pub fn pairs(&self) -> &[(i32, i32)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl PartialEq for ResidueAlignment {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for ResidueAlignment {}

impl TryFrom<Vec<(i32, i32)>> for ResidueAlignment {
    type Error = DihedraError;

    fn try_from(pairs: Vec<(i32, i32)>) -> Result<Self> {
        Self::from_pairs(pairs)
    }
}

impl From<ResidueAlignment> for Vec<(i32, i32)> {
    fn from(alignment: ResidueAlignment) -> Self {
        alignment.pairs
    }
}
