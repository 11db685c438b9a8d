//! PDB format reader and writer.
//!
//! Parses ATOM, HETATM, TER, HEADER, and MODEL/ENDMDL records from PDB-format
//! text. Multi-model (NMR) files yield one [`Structure`] per model; chains
//! whose records are split by a TER (e.g. trailing waters) are merged back
//! into a single chain.

use dihedra_core::{DihedraError, Result};

use crate::types::{Atom, Chain, Point3D, Residue, Structure};
use std::fmt::Write;

/// Parse a PDB-format string into a [`Structure`] holding its first model.
///
/// # Errors
///
/// Returns an error if no ATOM records are found or if an ATOM record is
/// malformed (wrong column widths, unparseable coordinates).
pub fn parse_pdb(input: &str) -> Result<Structure> {
    let mut models = parse_pdb_models(input)?;
    // parse_pdb_models never returns an empty Ok
    Ok(models.swap_remove(0))
}

/// Parse every model of a PDB-format string, in file order.
///
/// Files without MODEL records produce a single model numbered 0.
///
/// # Errors
///
/// Same conditions as [`parse_pdb`].
pub fn parse_pdb_models(input: &str) -> Result<Vec<Structure>> {
    let mut id = String::from("UNKN");
    let mut models: Vec<ModelBuilder> = Vec::new();
    let mut current = ModelBuilder::new(0);
    let mut atom_count = 0usize;

    for line in input.lines() {
        if line.starts_with("HEADER") && line.len() >= 66 {
            let pdb_id = line[62..66].trim();
            if !pdb_id.is_empty() {
                id = pdb_id.into();
            }
            continue;
        }

        if line.starts_with("MODEL") {
            let serial = safe_slice(line, 10, 14)
                .trim()
                .parse::<u32>()
                .unwrap_or(models.len() as u32 + 1);
            if !current.is_empty() {
                models.push(std::mem::replace(&mut current, ModelBuilder::new(serial)));
            } else {
                current.serial = serial;
            }
            continue;
        }

        if line.starts_with("ENDMDL") {
            let next = current.serial + 1;
            models.push(std::mem::replace(&mut current, ModelBuilder::new(next)));
            continue;
        }

        if line.starts_with("TER") {
            current.end_chain();
            continue;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");
        if is_atom || is_hetatm {
            let atom = parse_atom_record(line, is_hetatm)?;
            let key = ResidueKey {
                chain_id: parse_chain_id(line),
                seq_num: parse_residue_seq(line)?,
                i_code: parse_insertion_code(line),
                name: parse_residue_name(line),
            };
            current.push_atom(key, atom);
            atom_count += 1;
        }
    }
    if !current.is_empty() {
        models.push(current);
    }

    if atom_count == 0 {
        return Err(DihedraError::Parse("no ATOM records found".into()));
    }

    Ok(models
        .into_iter()
        .map(|m| m.finish(&id))
        .filter(|s| !s.chains.is_empty())
        .collect())
}

/// Parse the first model of a PDB file from disk. Gzip input is detected
/// and decompressed transparently.
#[cfg(feature = "std")]
pub fn parse_pdb_file(path: impl AsRef<std::path::Path>) -> Result<Structure> {
    let contents = dihedra_core::compress::read_text(path)?;
    parse_pdb(&contents)
}

/// Parse every model of a PDB file from disk (gzip aware).
#[cfg(feature = "std")]
pub fn parse_pdb_models_file(path: impl AsRef<std::path::Path>) -> Result<Vec<Structure>> {
    let contents = dihedra_core::compress::read_text(path)?;
    parse_pdb_models(&contents)
}

/// Render a single chain as PDB text: ATOM/HETATM records, TER, END.
///
/// Atom serials are renumbered from 1. The output parses back to an
/// equivalent chain with [`parse_pdb`].
pub fn write_chain(chain: &Chain) -> String {
    let mut out = String::new();
    let mut serial = 0u32;
    let mut last: Option<&Residue> = None;
    for residue in &chain.residues {
        for atom in &residue.atoms {
            serial += 1;
            push_atom_line(&mut out, serial, atom, residue, chain.id);
        }
        last = Some(residue);
    }
    if let Some(r) = last {
        serial += 1;
        let _ = writeln!(
            out,
            "TER   {:>5}      {:>3} {}{:>4}{}",
            serial,
            r.name,
            chain.id,
            r.seq_num,
            r.i_code.unwrap_or(' ')
        );
    }
    out.push_str("END\n");
    out
}

/// Write a single chain to a PDB file.
#[cfg(feature = "std")]
pub fn write_chain_file(chain: &Chain, path: impl AsRef<std::path::Path>) -> Result<()> {
    std::fs::write(path, write_chain(chain))?;
    Ok(())
}

fn push_atom_line(out: &mut String, serial: u32, atom: &Atom, residue: &Residue, chain_id: char) {
    let record = if atom.is_hetatm { "HETATM" } else { "ATOM  " };
    let element = atom.element.as_deref().unwrap_or("");
    let charge = match atom.charge {
        Some(c) if c > 0 => format!("{}+", c),
        Some(c) if c < 0 => format!("{}-", -c),
        _ => String::new(),
    };
    let _ = writeln!(
        out,
        "{}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:<2}",
        record,
        serial,
        pad_atom_name(&atom.name),
        atom.alt_loc.unwrap_or(' '),
        residue.name,
        chain_id,
        residue.seq_num,
        residue.i_code.unwrap_or(' '),
        atom.coords.x,
        atom.coords.y,
        atom.coords.z,
        atom.occupancy,
        atom.temp_factor,
        element,
        charge,
    );
}

/// Atom names keep their original four-column layout when they have one.
/// Bare names shorter than four characters start in column 14.
fn pad_atom_name(name: &str) -> String {
    if name.len() == 4 {
        name.to_string()
    } else {
        format!(" {:<3}", name.trim())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ResidueKey {
    chain_id: char,
    seq_num: i32,
    i_code: Option<char>,
    name: String,
}

/// Accumulates atoms into residues and chains for one model.
struct ModelBuilder {
    serial: u32,
    chains: Vec<Chain>,
    open_chain: Option<(char, Vec<Residue>)>,
    open_residue: Option<(ResidueKey, Vec<Atom>)>,
}

impl ModelBuilder {
    fn new(serial: u32) -> Self {
        Self {
            serial,
            chains: Vec::new(),
            open_chain: None,
            open_residue: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.open_chain.is_none() && self.open_residue.is_none()
    }

    fn push_atom(&mut self, key: ResidueKey, atom: Atom) {
        let same_residue = matches!(&self.open_residue, Some((k, _)) if *k == key);
        if !same_residue {
            self.end_residue();
            let same_chain = matches!(&self.open_chain, Some((cid, _)) if *cid == key.chain_id);
            if !same_chain {
                self.end_chain();
                self.open_chain = Some((key.chain_id, Vec::new()));
            }
            self.open_residue = Some((key, Vec::new()));
        }
        if let Some((_, atoms)) = self.open_residue.as_mut() {
            atoms.push(atom);
        }
    }

    fn end_residue(&mut self) {
        if let Some((key, atoms)) = self.open_residue.take() {
            let residue = Residue {
                name: key.name,
                seq_num: key.seq_num,
                i_code: key.i_code,
                atoms,
            };
            match self.open_chain.as_mut() {
                Some((_, residues)) => residues.push(residue),
                None => self.open_chain = Some((key.chain_id, vec![residue])),
            }
        }
    }

    fn end_chain(&mut self) {
        self.end_residue();
        if let Some((cid, residues)) = self.open_chain.take() {
            if residues.is_empty() {
                return;
            }
            match self.chains.iter_mut().find(|c| c.id == cid) {
                Some(existing) => existing.residues.extend(residues),
                None => self.chains.push(Chain::new(cid, residues)),
            }
        }
    }

    fn finish(mut self, id: &str) -> Structure {
        self.end_chain();
        Structure {
            id: id.to_string(),
            model: self.serial,
            chains: self.chains,
        }
    }
}

fn parse_atom_record(line: &str, is_hetatm: bool) -> Result<Atom> {
    // Fixed-width columns; coordinates end at column 54.
    if line.len() < 54 {
        return Err(DihedraError::Parse(format!(
            "ATOM record too short ({} chars): {}",
            line.len(),
            line
        )));
    }

    let serial = safe_slice(line, 6, 11)
        .trim()
        .parse::<u32>()
        .map_err(|e| DihedraError::Parse(format!("bad atom serial: {}", e)))?;

    let name = safe_slice(line, 12, 16).to_string();
    let alt_loc = non_blank(safe_slice(line, 16, 17));

    let coord = |start: usize, axis: &str| {
        safe_slice(line, start, start + 8)
            .trim()
            .parse::<f64>()
            .map_err(|e| DihedraError::Parse(format!("bad {} coordinate: {}", axis, e)))
    };
    let coords = Point3D::new(coord(30, "x")?, coord(38, "y")?, coord(46, "z")?);

    let occupancy = safe_slice(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0);
    let temp_factor = safe_slice(line, 60, 66).trim().parse::<f64>().unwrap_or(0.0);

    let element = match safe_slice(line, 76, 78).trim() {
        "" => None,
        e => Some(e.to_string()),
    };
    let charge = parse_pdb_charge(safe_slice(line, 78, 80).trim());

    Ok(Atom {
        serial,
        name,
        alt_loc,
        coords,
        occupancy,
        temp_factor,
        element,
        charge,
        is_hetatm,
    })
}

fn non_blank(s: &str) -> Option<char> {
    s.chars().next().filter(|c| *c != ' ')
}

fn parse_chain_id(line: &str) -> char {
    safe_slice(line, 21, 22).chars().next().unwrap_or(' ')
}

fn parse_residue_seq(line: &str) -> Result<i32> {
    safe_slice(line, 22, 26)
        .trim()
        .parse::<i32>()
        .map_err(|e| DihedraError::Parse(format!("bad residue seq number: {}", e)))
}

fn parse_insertion_code(line: &str) -> Option<char> {
    non_blank(safe_slice(line, 26, 27))
}

fn parse_residue_name(line: &str) -> String {
    safe_slice(line, 17, 20).trim().to_string()
}

/// Charges are written "2+" or "1-"; the reversed "+2" form also appears.
fn parse_pdb_charge(s: &str) -> Option<i8> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (digit, sign) = match (bytes[0], bytes[1]) {
        (d, s @ (b'+' | b'-')) if d.is_ascii_digit() => (d, s),
        (s @ (b'+' | b'-'), d) if d.is_ascii_digit() => (d, s),
        _ => return None,
    };
    let magnitude = (digit - b'0') as i8;
    Some(if sign == b'+' { magnitude } else { -magnitude })
}

/// Substring that tolerates short lines.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let len = s.len();
    if start >= len {
        return "";
    }
    s.get(start..end.min(len)).unwrap_or("")
}
