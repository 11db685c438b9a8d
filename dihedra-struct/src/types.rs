//! Coordinate model: one parsed model of a PDB entry, as chains of residues
//! of atoms.

use dihedra_core::Summarizable;

/// Cartesian coordinates in Ångström, also used as a 3-vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// `self - other`.
    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f64) -> Point3D {
        Point3D::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length of the vector.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// The vector scaled to unit length. A (near) zero vector is returned
    /// unchanged.
    pub fn unit(&self) -> Point3D {
        let n = self.norm();
        if n < 1e-15 {
            *self
        } else {
            self.scale(1.0 / n)
        }
    }
}

/// One ATOM or HETATM record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    pub serial: u32,
    /// Atom name as written in columns 13-16, padding included.
    pub name: String,
    /// Alternate location indicator (column 17).
    pub alt_loc: Option<char>,
    pub coords: Point3D,
    pub occupancy: f64,
    /// Temperature factor (B-factor).
    pub temp_factor: f64,
    pub element: Option<String>,
    pub charge: Option<i8>,
    pub is_hetatm: bool,
}

/// The 20 standard amino acids, three-letter name to one-letter code.
const STANDARD_AMINO_ACIDS: [(&str, char); 20] = [
    ("ALA", 'A'),
    ("ARG", 'R'),
    ("ASN", 'N'),
    ("ASP", 'D'),
    ("CYS", 'C'),
    ("GLN", 'Q'),
    ("GLU", 'E'),
    ("GLY", 'G'),
    ("HIS", 'H'),
    ("ILE", 'I'),
    ("LEU", 'L'),
    ("LYS", 'K'),
    ("MET", 'M'),
    ("PHE", 'F'),
    ("PRO", 'P'),
    ("SER", 'S'),
    ("THR", 'T'),
    ("TRP", 'W'),
    ("TYR", 'Y'),
    ("VAL", 'V'),
];

/// One-letter code of a standard amino acid, given its three-letter name.
/// Modified residues such as `MSE` have none.
pub fn one_letter_code(three: &str) -> Option<char> {
    let three = three.trim();
    STANDARD_AMINO_ACIDS
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(three))
        .map(|&(_, c)| c)
}

/// A residue of a chain: amino acid, ligand or water.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residue {
    /// Residue name from columns 18-20, e.g. `ALA` or `HOH`.
    pub name: String,
    /// Author residue number (columns 23-26).
    pub seq_num: i32,
    pub i_code: Option<char>,
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// First atom with the given name, ignoring column padding.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name.trim() == name)
    }

    pub fn get_alpha_carbon(&self) -> Option<&Atom> {
        self.get_atom("CA")
    }

    pub fn one_letter_code(&self) -> Option<char> {
        one_letter_code(&self.name)
    }

    pub fn is_standard_amino_acid(&self) -> bool {
        self.one_letter_code().is_some()
    }
}

/// Residues sharing a chain identifier, in file order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    pub id: char,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: char, residues: Vec<Residue>) -> Self {
        Self { id, residues }
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }

    /// Standard amino-acid residues only; waters and ligands are skipped.
    pub fn amino_acids(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter().filter(|r| r.is_standard_amino_acid())
    }
}

/// One model of a structure file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// Entry name: the HEADER ID code, else whatever the caller supplied.
    pub id: String,
    /// MODEL serial number, 0 when the file has no MODEL records.
    pub model: u32,
    pub chains: Vec<Chain>,
}

impl Structure {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::residue_count).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(Chain::atom_count).sum()
    }

    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        format!(
            "{} (model {}): {} chain(s), {} residue(s), {} atom(s)",
            self.id,
            self.model,
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_atom(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom {
            serial: 1,
            name: name.into(),
            alt_loc: None,
            coords: Point3D::new(x, y, z),
            occupancy: 1.0,
            temp_factor: 0.0,
            element: None,
            charge: None,
            is_hetatm: false,
        }
    }

    pub(crate) fn make_residue(name: &str, seq_num: i32, atoms: Vec<Atom>) -> Residue {
        Residue {
            name: name.into(),
            seq_num,
            i_code: None,
            atoms,
        }
    }

    #[test]
    fn vector_operations() {
        let p = Point3D::new(1.0, 2.0, 2.0);
        let q = Point3D::new(4.0, 6.0, 2.0);
        assert_eq!(q.sub(&p), Point3D::new(3.0, 4.0, 0.0));
        assert!((p.norm() - 3.0).abs() < 1e-10);
        assert!((p.dot(&q) - 20.0).abs() < 1e-10);

        let k = Point3D::new(1.0, 0.0, 0.0).cross(&Point3D::new(0.0, 1.0, 0.0));
        assert_eq!(k, Point3D::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn unit_vectors() {
        let u = Point3D::new(0.0, 3.0, 4.0).unit();
        assert!((u.norm() - 1.0).abs() < 1e-10);
        assert!((u.z - 0.8).abs() < 1e-10);
        let zero = Point3D::new(0.0, 0.0, 0.0);
        assert_eq!(zero.unit(), zero);
    }

    #[test]
    fn standard_amino_acid_codes() {
        assert_eq!(one_letter_code("ALA"), Some('A'));
        assert_eq!(one_letter_code("trp"), Some('W'));
        assert_eq!(one_letter_code(" GLY "), Some('G'));
        assert_eq!(one_letter_code("HOH"), None);
        assert_eq!(one_letter_code("MSE"), None);
    }

    #[test]
    fn atom_lookup_ignores_padding() {
        let r = make_residue(
            "ALA",
            1,
            vec![
                make_atom(" N  ", 0.0, 0.0, 0.0),
                make_atom(" CA ", 1.0, 0.0, 0.0),
                make_atom(" C  ", 2.0, 0.0, 0.0),
            ],
        );
        assert!(r.get_alpha_carbon().is_some());
        assert!(r.get_atom("C").is_some());
        assert!(r.is_standard_amino_acid());
    }

    #[test]
    fn chain_amino_acids_skip_hetero() {
        let chain = Chain::new(
            'A',
            vec![
                make_residue("GLY", 1, vec![make_atom("CA", 1.0, 2.0, 3.0)]),
                make_residue("HOH", 2, vec![make_atom("O", 1.0, 2.0, 3.0)]),
            ],
        );
        assert_eq!(chain.amino_acids().count(), 1);
        assert_eq!(chain.atom_count(), 2);
    }

    #[test]
    fn structure_summary() {
        let chain = Chain::new(
            'A',
            vec![make_residue("GLY", 1, vec![make_atom("CA", 1.0, 2.0, 3.0)])],
        );
        let s = Structure {
            id: "1ABC".into(),
            model: 0,
            chains: vec![chain],
        };
        assert_eq!(s.summary(), "1ABC (model 0): 1 chain(s), 1 residue(s), 1 atom(s)");
    }
}
