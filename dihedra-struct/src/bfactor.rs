//! Per-residue temperature factors.

use crate::types::Structure;

/// Average B-factor of one residue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidueBFactor {
    #[cfg_attr(feature = "serde", serde(rename = "Model"))]
    pub model: usize,
    #[cfg_attr(feature = "serde", serde(rename = "Chain"))]
    pub chain: char,
    #[cfg_attr(feature = "serde", serde(rename = "ResidueName"))]
    pub residue_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "ResidueNumber"))]
    pub residue_number: i32,
    #[cfg_attr(feature = "serde", serde(rename = "AverageBFactor"))]
    pub average: f64,
}

/// Average B-factor per residue over every model, chain, and residue.
///
/// Models are numbered by position starting at 0. Atoms with an
/// alternate location indicator are excluded; residues left with no
/// atoms produce no row.
pub fn residue_b_factors(models: &[Structure]) -> Vec<ResidueBFactor> {
    let mut out = Vec::new();
    for (model, structure) in models.iter().enumerate() {
        for chain in &structure.chains {
            for residue in &chain.residues {
                let (sum, n) = residue
                    .atoms
                    .iter()
                    .filter(|a| a.alt_loc.is_none())
                    .fold((0.0, 0usize), |(s, n), a| (s + a.temp_factor, n + 1));
                if n == 0 {
                    continue;
                }
                out.push(ResidueBFactor {
                    model,
                    chain: chain.id,
                    residue_name: residue.name.clone(),
                    residue_number: residue.seq_num,
                    average: sum / n as f64,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::parse_pdb_models;

    #[test]
    fn averages_skip_alternate_locations() {
        let input = "\
ATOM      1  N   SER A  10       1.000   2.000   3.000  1.00 10.00           N\n\
ATOM      2  CA  SER A  10       1.000   2.000   3.000  1.00 20.00           C\n\
ATOM      3  OG ASER A  10       1.000   2.000   3.000  0.50 90.00           O\n\
ATOM      4  OG BSER A  10       1.000   2.000   3.000  0.50 80.00           O\n\
ATOM      5  CA  GLY A  11       1.000   2.000   3.000  1.00 40.00           C\n\
END\n";
        let models = parse_pdb_models(input).unwrap();
        let rows = residue_b_factors(&models);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, 0);
        assert_eq!(rows[0].chain, 'A');
        assert_eq!(rows[0].residue_name, "SER");
        assert_eq!(rows[0].residue_number, 10);
        assert!((rows[0].average - 15.0).abs() < 1e-10);
        assert!((rows[1].average - 40.0).abs() < 1e-10);
    }

    #[test]
    fn residue_with_only_alternates_is_dropped() {
        let input = "\
ATOM      1  CA AALA A   1       1.000   2.000   3.000  0.50 10.00           C\n\
ATOM      2  CA BALA A   1       1.000   2.000   3.000  0.50 12.00           C\n\
END\n";
        let models = parse_pdb_models(input).unwrap();
        assert!(residue_b_factors(&models).is_empty());
    }
}
