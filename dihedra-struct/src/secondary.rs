//! Secondary structure classes derived from DSSP codes.
//!
//! DSSP assigns one of eight states per residue (or blank). The pipeline
//! collapses them into four classes and reports per-class percentages.

use dihedra_core::Summarizable;

/// Full 8-state DSSP classification, plus the polyproline code newer
/// `mkdssp` releases emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DsspState {
    /// Alpha-helix.
    H,
    /// 3_10-helix.
    G,
    /// Pi-helix.
    I,
    /// Extended strand in beta-sheet.
    E,
    /// Isolated beta-bridge residue.
    B,
    /// Hydrogen-bonded turn.
    T,
    /// Bend.
    S,
    /// Polyproline II helix.
    P,
    /// No assignment (blank column).
    C,
}

impl DsspState {
    /// Parse a DSSP structure column. Unknown characters are treated as blank.
    pub fn from_code(code: char) -> Self {
        match code {
            'H' => DsspState::H,
            'G' => DsspState::G,
            'I' => DsspState::I,
            'E' => DsspState::E,
            'B' => DsspState::B,
            'T' => DsspState::T,
            'S' => DsspState::S,
            'P' => DsspState::P,
            _ => DsspState::C,
        }
    }

    /// Single-character DSSP code.
    pub fn code(&self) -> char {
        match self {
            DsspState::H => 'H',
            DsspState::G => 'G',
            DsspState::I => 'I',
            DsspState::E => 'E',
            DsspState::B => 'B',
            DsspState::T => 'T',
            DsspState::S => 'S',
            DsspState::P => 'P',
            DsspState::C => ' ',
        }
    }

    /// Collapse into the four reporting classes. Bends count as coil.
    pub fn to_simplified(&self) -> SecondaryStructure {
        match self {
            DsspState::H | DsspState::G | DsspState::I => SecondaryStructure::Helix,
            DsspState::E | DsspState::B => SecondaryStructure::BetaStrand,
            DsspState::T => SecondaryStructure::Turn,
            DsspState::S | DsspState::P | DsspState::C => SecondaryStructure::Coil,
        }
    }
}

/// Four-class secondary structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecondaryStructure {
    #[cfg_attr(feature = "serde", serde(rename = "Helix"))]
    Helix,
    #[cfg_attr(feature = "serde", serde(rename = "Beta Strand"))]
    BetaStrand,
    #[cfg_attr(feature = "serde", serde(rename = "Turn"))]
    Turn,
    #[cfg_attr(feature = "serde", serde(rename = "Coil"))]
    Coil,
}

impl SecondaryStructure {
    /// All classes in reporting order.
    pub const ALL: [SecondaryStructure; 4] = [
        SecondaryStructure::Helix,
        SecondaryStructure::BetaStrand,
        SecondaryStructure::Turn,
        SecondaryStructure::Coil,
    ];

    /// Human-readable label used in output tables.
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryStructure::Helix => "Helix",
            SecondaryStructure::BetaStrand => "Beta Strand",
            SecondaryStructure::Turn => "Turn",
            SecondaryStructure::Coil => "Coil",
        }
    }
}

impl core::fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Residue counts per [`SecondaryStructure`] class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecondaryComposition {
    pub helix: usize,
    pub beta_strand: usize,
    pub turn: usize,
    pub coil: usize,
}

impl SecondaryComposition {
    /// Tally a sequence of classes.
    pub fn from_classes<I: IntoIterator<Item = SecondaryStructure>>(classes: I) -> Self {
        let mut c = Self::default();
        for ss in classes {
            c.add(ss);
        }
        c
    }

    /// Count one more residue of the given class.
    pub fn add(&mut self, ss: SecondaryStructure) {
        match ss {
            SecondaryStructure::Helix => self.helix += 1,
            SecondaryStructure::BetaStrand => self.beta_strand += 1,
            SecondaryStructure::Turn => self.turn += 1,
            SecondaryStructure::Coil => self.coil += 1,
        }
    }

    pub fn count(&self, ss: SecondaryStructure) -> usize {
        match ss {
            SecondaryStructure::Helix => self.helix,
            SecondaryStructure::BetaStrand => self.beta_strand,
            SecondaryStructure::Turn => self.turn,
            SecondaryStructure::Coil => self.coil,
        }
    }

    pub fn total(&self) -> usize {
        self.helix + self.beta_strand + self.turn + self.coil
    }

    /// Percentage of residues in `ss`; `None` when nothing was counted.
    pub fn percentage(&self, ss: SecondaryStructure) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.count(ss) as f64 * 100.0 / n as f64),
        }
    }
}

impl Summarizable for SecondaryComposition {
    fn summary(&self) -> String {
        format!(
            "{} residue(s): H:{} E:{} T:{} C:{}",
            self.total(),
            self.helix,
            self.beta_strand,
            self.turn,
            self.coil,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dssp_codes_collapse_to_four_classes() {
        let helix: [char; 3] = ['H', 'G', 'I'];
        for c in helix {
            assert_eq!(DsspState::from_code(c).to_simplified(), SecondaryStructure::Helix);
        }
        for c in ['E', 'B'] {
            assert_eq!(
                DsspState::from_code(c).to_simplified(),
                SecondaryStructure::BetaStrand
            );
        }
        assert_eq!(DsspState::from_code('T').to_simplified(), SecondaryStructure::Turn);
        for c in ['S', ' ', 'P', '?'] {
            assert_eq!(DsspState::from_code(c).to_simplified(), SecondaryStructure::Coil);
        }
    }

    #[test]
    fn code_roundtrip() {
        for c in ['H', 'G', 'I', 'E', 'B', 'T', 'S', 'P', ' '] {
            assert_eq!(DsspState::from_code(c).code(), c);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(SecondaryStructure::BetaStrand.label(), "Beta Strand");
        assert_eq!(format!("{}", SecondaryStructure::Coil), "Coil");
    }

    #[test]
    fn composition_percentages() {
        let c = SecondaryComposition::from_classes([
            SecondaryStructure::Helix,
            SecondaryStructure::Helix,
            SecondaryStructure::Turn,
            SecondaryStructure::Coil,
        ]);
        assert_eq!(c.total(), 4);
        assert!((c.percentage(SecondaryStructure::Helix).unwrap() - 50.0).abs() < 1e-10);
        assert!((c.percentage(SecondaryStructure::BetaStrand).unwrap()).abs() < 1e-10);
        let sum: f64 = SecondaryStructure::ALL
            .iter()
            .filter_map(|s| c.percentage(*s))
            .sum();
        assert!((sum - 100.0).abs() < 1e-10);
        assert!(c.summary().contains("H:2"));
    }

    #[test]
    fn empty_composition_has_no_percentages() {
        let c = SecondaryComposition::default();
        assert_eq!(c.percentage(SecondaryStructure::Coil), None);
    }
}
