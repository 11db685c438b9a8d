//! Per-family limits on the reference residue numbers entering an analysis.
//!
//! Each protein family carries a maximum reference residue number; residues
//! past it (tails, tags, linkers) are excluded before entropy reduction. The
//! table is supplied by configuration rather than compiled in.

use std::collections::BTreeMap;

use crate::delta::ResidueDelta;

/// Mapping from family name to the largest reference residue number kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FamilyCutoffs {
    cutoffs: BTreeMap<String, i32>,
}

impl FamilyCutoffs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cutoff for `family`, returning the previous value if any.
    pub fn insert(&mut self, family: impl Into<String>, max_residue: i32) -> Option<i32> {
        self.cutoffs.insert(family.into(), max_residue)
    }

    /// Cutoff for `family`, if one is configured.
    pub fn get(&self, family: &str) -> Option<i32> {
        self.cutoffs.get(family).copied()
    }

    pub fn len(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }

    /// Keep only records whose reference residue is within the family's
    /// cutoff. Families without a cutoff keep everything.
    pub fn retain<R: ResidueDelta>(&self, family: &str, records: &mut Vec<R>) {
        if let Some(max) = self.get(family) {
            records.retain(|r| r.ref_residue_position() <= max);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for FamilyCutoffs {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self {
            cutoffs: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::DeltaRecord;

    fn record(n: i32) -> DeltaRecord {
        DeltaRecord {
            ref_residue_position: n,
            target_residue_position: n,
            delta_phi: 1.0,
            delta_psi: 1.0,
        }
    }

    #[test]
    fn retain_applies_cutoff_inclusively() {
        let cutoffs: FamilyCutoffs = [("KRAS", 166)].into_iter().collect();
        let mut records = vec![record(1), record(166), record(167), record(200)];
        cutoffs.retain("KRAS", &mut records);
        let kept: Vec<i32> = records.iter().map(|r| r.ref_residue_position).collect();
        assert_eq!(kept, vec![1, 166]);
    }

    #[test]
    fn unknown_family_keeps_everything() {
        let cutoffs: FamilyCutoffs = [("Myoglobin", 151)].into_iter().collect();
        let mut records = vec![record(1), record(500)];
        cutoffs.retain("Azurin", &mut records);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn insert_reports_previous() {
        let mut cutoffs = FamilyCutoffs::new();
        assert_eq!(cutoffs.insert("Lysozyme-C", 130), None);
        assert_eq!(cutoffs.insert("Lysozyme-C", 146), Some(130));
        assert_eq!(cutoffs.get("Lysozyme-C"), Some(146));
        assert_eq!(cutoffs.len(), 1);
    }
}
