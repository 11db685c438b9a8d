//! Classic DSSP output parser.
//!
//! The residue section starts after the line beginning `  #  RESIDUE`.
//! Each row is fixed-width; the columns read here are:
//!
//! | columns | field                          |
//! |---------|--------------------------------|
//! | 6-10    | residue number (PDB numbering) |
//! | 11      | insertion code                 |
//! | 12      | chain                          |
//! | 14      | amino acid (one letter)        |
//! | 17      | secondary structure code       |
//! | 35-38   | accessible surface area        |
//!
//! Chain breaks are rows with `!` in the amino-acid column and are skipped.

use std::path::Path;

use dihedra_core::{DihedraError, Result};
use dihedra_struct::{DsspState, SecondaryStructure};
use log::debug;

/// One residue row of a DSSP file.
#[derive(Debug, Clone, PartialEq)]
pub struct DsspResidue {
    pub residue_number: i32,
    pub insertion_code: Option<char>,
    pub chain: char,
    /// One-letter code; DSSP's lowercase half-cystine labels become `C`.
    pub amino_acid: char,
    pub state: DsspState,
    /// Solvent accessibility in Å², `None` when the column is unreadable.
    pub accessibility: Option<f64>,
}

impl DsspResidue {
    /// Four-class secondary structure.
    pub fn class(&self) -> SecondaryStructure {
        self.state.to_simplified()
    }
}

/// One row of an accessibility table.
#[derive(Debug, Clone, PartialEq)]
pub struct AsaRecord {
    pub residue_number: i32,
    pub residue_type: char,
    pub asa: Option<f64>,
}

const HEADER_PREFIX: &str = "  #  RESIDUE";

/// Parse the residue section of a classic DSSP file.
///
/// # Errors
///
/// Returns an error if the residue header is absent or a residue row has
/// an unreadable residue number.
pub fn parse_dssp(input: &str) -> Result<Vec<DsspResidue>> {
    let mut lines = input.lines();
    if !lines.by_ref().any(|l| l.starts_with(HEADER_PREFIX)) {
        return Err(DihedraError::Parse(
            "DSSP residue header (\"  #  RESIDUE\") not found".into(),
        ));
    }

    let mut residues = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let amino_acid = column(line, 13);
        if amino_acid == '!' {
            debug!("chain break at DSSP row {}", slice(line, 0, 5).trim());
            continue;
        }
        let number = slice(line, 5, 10).trim();
        let residue_number = number.parse::<i32>().map_err(|e| {
            DihedraError::Parse(format!("bad DSSP residue number {:?}: {}", number, e))
        })?;
        let insertion_code = Some(column(line, 10)).filter(|c| *c != ' ');
        residues.push(DsspResidue {
            residue_number,
            insertion_code,
            chain: column(line, 11),
            amino_acid: if amino_acid.is_ascii_lowercase() {
                'C'
            } else {
                amino_acid
            },
            state: DsspState::from_code(column(line, 16)),
            accessibility: slice(line, 34, 38).trim().parse::<f64>().ok(),
        });
    }
    Ok(residues)
}

/// Read and parse a DSSP file.
pub fn parse_dssp_file(path: impl AsRef<Path>) -> Result<Vec<DsspResidue>> {
    let text = dihedra_core::compress::read_text(path)?;
    parse_dssp(&text)
}

/// Accessibility rows for one chain, in file order.
pub fn asa_records(residues: &[DsspResidue], chain: char) -> Vec<AsaRecord> {
    residues
        .iter()
        .filter(|r| r.chain == chain)
        .map(|r| AsaRecord {
            residue_number: r.residue_number,
            residue_type: r.amino_acid,
            asa: r.accessibility,
        })
        .collect()
}

fn slice(line: &str, start: usize, end: usize) -> &str {
    if start >= line.len() {
        return "";
    }
    line.get(start..end.min(line.len())).unwrap_or("")
}

fn column(line: &str, index: usize) -> char {
    slice(line, index, index + 1).chars().next().unwrap_or(' ')
}
