//! Residue correspondence between two aligned chains.
//!
//! A mapping file holds one line per aligned column, mobile residue first:
//!
//! ```text
//! 12M - 15M
//! 13K - --
//! ```
//!
//! A side written `--` is a gap. Mapping files are named
//! `<mobile>_vs_<reference>_residue_mapping.txt`, where both names follow
//! the `<pdb>_Chain<ID>` chain-file convention.

use std::fmt;

use dihedra_core::{DihedraError, ResidueAlignment, Result};
use log::warn;

use crate::tmalign::AlignmentBlock;

/// Suffix of residue mapping files.
pub const MAPPING_SUFFIX: &str = "_residue_mapping.txt";

/// A residue on one side of an aligned column: `(number, one-letter code)`.
pub type MappedResidue = Option<(i32, char)>;

/// One aligned column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingLine {
    pub mobile: MappedResidue,
    pub reference: MappedResidue,
}

impl fmt::Display for MappingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, self.mobile)?;
        f.write_str(" - ")?;
        write_side(f, self.reference)
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, side: MappedResidue) -> fmt::Result {
    match side {
        Some((n, aa)) => write!(f, "{}{}", n, aa),
        None => f.write_str("--"),
    }
}

/// Walk an alignment block and attach residue numbers.
///
/// Every non-gap character consumes the next residue of its chain, in
/// order. Columns whose marker is a space are consumed but not reported.
/// When a chain runs out of residues before its sequence does, the side is
/// reported as a gap and a warning is logged.
pub fn map_residues(
    block: &AlignmentBlock,
    mobile_residues: &[(i32, char)],
    reference_residues: &[(i32, char)],
) -> Vec<MappingLine> {
    let mut mobile = Cursor::new("mobile", mobile_residues);
    let mut reference = Cursor::new("reference", reference_residues);

    block
        .columns()
        .filter_map(|(m, marker, r)| {
            let line = MappingLine {
                mobile: mobile.take(m),
                reference: reference.take(r),
            };
            (marker != ' ').then_some(line)
        })
        .collect()
}

struct Cursor<'a> {
    label: &'static str,
    residues: &'a [(i32, char)],
    next: usize,
}

impl<'a> Cursor<'a> {
    fn new(label: &'static str, residues: &'a [(i32, char)]) -> Self {
        Self {
            label,
            residues,
            next: 0,
        }
    }

    fn take(&mut self, aligned: char) -> MappedResidue {
        if aligned == '-' {
            return None;
        }
        let residue = self.residues.get(self.next).copied();
        if residue.is_none() {
            warn!(
                "{} sequence longer than its residue list ({} residues)",
                self.label,
                self.residues.len()
            );
        }
        self.next += 1;
        residue
    }
}

/// Render mapping lines, one per line with a trailing newline.
pub fn format_mapping(lines: &[MappingLine]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

/// Parse a mapping file into mobile → reference residue numbers.
///
/// Lines with a gap on either side are skipped; the mobile chain becomes
/// the alignment's reference side. A residue number seen a second time on
/// either side (insertion codes share a number) keeps its first mapping and
/// the later line is dropped with a warning.
///
/// # Errors
///
/// Returns an error on a malformed line.
pub fn parse_mapping(text: &str) -> Result<ResidueAlignment> {
    let mut alignment = ResidueAlignment::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (left, right) = line.split_once(" - ").ok_or_else(|| {
            DihedraError::Parse(format!("mapping line {}: expected \"<a> - <b>\": {}", i + 1, line))
        })?;
        let parse = |side: &str| {
            parse_side(side).ok_or_else(|| {
                DihedraError::Parse(format!("mapping line {}: bad residue {:?}", i + 1, side))
            })
        };
        if let (Some((a, _)), Some((b, _))) = (parse(left)?, parse(right)?) {
            if let Err(e) = alignment.push(a, b) {
                warn!("mapping line {}: {}, keeping the first mapping", i + 1, e);
            }
        }
    }
    Ok(alignment)
}

/// `"12A"` → `Some(Some((12, 'A')))`, `"--"` → `Some(None)`.
fn parse_side(side: &str) -> Option<MappedResidue> {
    let side = side.trim();
    if side == "--" {
        return Some(None);
    }
    let code = side.chars().last()?;
    if !code.is_ascii_alphabetic() {
        return None;
    }
    let number = side[..side.len() - code.len_utf8()].parse::<i32>().ok()?;
    Some(Some((number, code)))
}

/// Split `<a>_vs_<b>` into its two names.
pub fn split_pair_stem(stem: &str) -> Option<(&str, &str)> {
    let (a, b) = stem.split_once("_vs_")?;
    (!a.is_empty() && !b.is_empty()).then_some((a, b))
}

/// Split a chain-file stem `<pdb>_Chain<ID>` into the PDB name and chain ID.
pub fn split_chain_stem(stem: &str) -> Option<(&str, char)> {
    let (pdb, chain) = stem.rsplit_once("_Chain")?;
    let mut chars = chain.chars();
    match (chars.next(), chars.next()) {
        (Some(id), None) if !pdb.is_empty() => Some((pdb, id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(mobile: &str, markers: &str, reference: &str) -> AlignmentBlock {
        AlignmentBlock {
            mobile: mobile.into(),
            markers: markers.into(),
            reference: reference.into(),
        }
    }

    #[test]
    fn maps_columns_and_skips_unmarked() {
        let b = block("MKV-LAGT", "::: ..: ", "MKVALS-T");
        let mobile = [(10, 'M'), (11, 'K'), (12, 'V'), (13, 'L'), (14, 'A'), (15, 'G'), (16, 'T')];
        let reference = [(1, 'M'), (2, 'K'), (3, 'V'), (4, 'A'), (5, 'L'), (6, 'S'), (7, 'T')];
        let lines = map_residues(&b, &mobile, &reference);
        let text = format_mapping(&lines);
        assert_eq!(
            text,
            "10M - 1M\n11K - 2K\n12V - 3V\n13L - 5L\n14A - 6S\n15G - --\n"
        );
    }

    #[test]
    fn short_residue_list_becomes_gap() {
        let b = block("AB", "::", "AB");
        let lines = map_residues(&b, &[(1, 'A')], &[(1, 'A'), (2, 'B')]);
        assert_eq!(lines[1].mobile, None);
        assert_eq!(lines[1].reference, Some((2, 'B')));
    }

    #[test]
    fn parse_skips_gaps() {
        let aln = parse_mapping("10M - 1M\n15G - --\n-- - 9K\n-3A - 4A\n\n").unwrap();
        assert_eq!(aln.pairs(), &[(10, 1), (-3, 4)]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_mapping("10M 1M\n").is_err());
        assert!(parse_mapping("M - 1M\n").is_err());
    }

    #[test]
    fn parse_keeps_first_of_repeated_residue() {
        let aln = parse_mapping("10M - 1M\n11K - 1M\n12V - 2V\n12A - 3A\n").unwrap();
        assert_eq!(aln.pairs(), &[(10, 1), (12, 2)]);
    }

    #[test]
    fn insertion_code_residues_map_without_losing_the_chain() {
        // 184 and 184A share a sequence number in the mobile chain.
        let b = block("GGAL", "::::", "GASL");
        let mobile = [(183, 'G'), (184, 'G'), (184, 'A'), (185, 'L')];
        let reference = [(180, 'G'), (181, 'A'), (182, 'S'), (183, 'L')];
        let text = format_mapping(&map_residues(&b, &mobile, &reference));
        assert_eq!(text, "183G - 180G\n184G - 181A\n184A - 182S\n185L - 183L\n");

        let aln = parse_mapping(&text).unwrap();
        assert_eq!(aln.pairs(), &[(183, 180), (184, 181), (185, 183)]);
    }

    #[test]
    fn format_then_parse() {
        let lines = vec![
            MappingLine {
                mobile: Some((3, 'G')),
                reference: Some((7, 'G')),
            },
            MappingLine {
                mobile: None,
                reference: Some((8, 'W')),
            },
        ];
        let aln = parse_mapping(&format_mapping(&lines)).unwrap();
        assert_eq!(aln.pairs(), &[(3, 7)]);
    }

    #[test]
    fn stems() {
        assert_eq!(
            split_pair_stem("2xyz_ChainA_vs_1abc_ChainB"),
            Some(("2xyz_ChainA", "1abc_ChainB"))
        );
        assert_eq!(split_pair_stem("nothing"), None);
        assert_eq!(split_chain_stem("1abc_ChainB"), Some(("1abc", 'B')));
        assert_eq!(split_chain_stem("1abc_Chain"), None);
        assert_eq!(split_chain_stem("1abc"), None);
    }
}
