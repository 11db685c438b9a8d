//! TM-align text output.
//!
//! Extracts the summary statistics and the three-line alignment block that
//! follows the `(":" denotes residue pairs ...)` legend:
//!
//! ```text
//! (":" denotes residue pairs of d < 5.0 Angstrom, "." denotes other aligned residues)
//! MKV-LAGT
//! ::: ..:
//! MKVALS-T
//! ```
//!
//! The first sequence line belongs to the first structure passed to TM-align
//! (the mobile chain), the last to the second (the reference).

use dihedra_core::{DihedraError, Result, Scored};

/// The aligned sequences and per-column markers of one TM-align run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub mobile: String,
    /// `:` close pair, `.` other aligned pair, space for unaligned columns.
    /// Padded with spaces to the sequence length.
    pub markers: String,
    pub reference: String,
}

impl AlignmentBlock {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.mobile.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.mobile.is_empty()
    }

    /// `(mobile, marker, reference)` for each column.
    pub fn columns(&self) -> impl Iterator<Item = (char, char, char)> + '_ {
        self.mobile
            .chars()
            .zip(self.markers.chars())
            .zip(self.reference.chars())
            .map(|((m, k), r)| (m, k, r))
    }
}

/// Parsed TM-align report.
#[derive(Debug, Clone, PartialEq)]
pub struct TmAlignReport {
    pub aligned_length: Option<usize>,
    pub rmsd: Option<f64>,
    pub seq_identity: Option<f64>,
    /// TM-scores in report order: normalised by the first chain, then the second.
    pub tm_scores: Vec<f64>,
    pub alignment: Option<AlignmentBlock>,
}

impl TmAlignReport {
    /// Whether the alignment is close enough to keep. A report without an
    /// RMSD never passes.
    pub fn within_rmsd(&self, max_rmsd: f64) -> bool {
        self.rmsd.is_some_and(|r| r <= max_rmsd)
    }
}

/// TM-score normalised by the reference chain, NaN when absent.
impl Scored for TmAlignReport {
    fn score(&self) -> f64 {
        self.tm_scores.last().copied().unwrap_or(f64::NAN)
    }
}

const LEGEND_MARKERS: [&str; 2] = ["denotes residue pairs", "denotes other aligned residues"];

/// Parse TM-align standard output.
///
/// Missing statistics are left as `None`; only a truncated alignment block
/// is an error.
pub fn parse_tmalign(output: &str) -> Result<TmAlignReport> {
    let mut report = TmAlignReport {
        aligned_length: None,
        rmsd: None,
        seq_identity: None,
        tm_scores: Vec::new(),
        alignment: None,
    };

    let mut lines = output.lines();
    while let Some(line) = lines.next() {
        if line.starts_with("Aligned length=") {
            report.aligned_length = field_after(line, "Aligned length=").and_then(|v| v.parse().ok());
            report.rmsd = field_after(line, "RMSD=").and_then(|v| v.parse().ok());
            report.seq_identity = field_after(line, "n_aligned=").and_then(|v| v.parse().ok());
        } else if line.starts_with("TM-score=") {
            if let Some(score) = field_after(line, "TM-score=").and_then(|v| v.parse().ok()) {
                report.tm_scores.push(score);
            }
        } else if LEGEND_MARKERS.iter().any(|m| line.contains(m)) {
            report.alignment = Some(read_block(&mut lines)?);
            break;
        }
    }
    Ok(report)
}

/// The numeric token following `key`, up to the next comma or whitespace.
fn field_after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line[line.find(key)? + key.len()..].trim_start();
    let end = rest
        .find(|c: char| c == ',' || c.is_whitespace())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn read_block<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Result<AlignmentBlock> {
    let truncated = || DihedraError::Parse("TM-align alignment block is truncated".into());

    let mobile = lines
        .by_ref()
        .map(|l| l.trim_end())
        .find(|l| !l.is_empty())
        .ok_or_else(truncated)?
        .to_string();
    // The marker row can be blank (no aligned pairs) and must keep its
    // leading spaces to stay in register with the sequences.
    let markers = lines.next().ok_or_else(truncated)?.trim_end_matches(['\r', '\n']);
    let reference = lines.next().ok_or_else(truncated)?.trim_end().to_string();

    let width = mobile.chars().count();
    if reference.chars().count() != width {
        return Err(DihedraError::Parse(format!(
            "TM-align sequences differ in length ({} vs {})",
            width,
            reference.chars().count()
        )));
    }
    let mut markers: String = markers.chars().take(width).collect();
    let pad = width - markers.chars().count();
    markers.extend(std::iter::repeat(' ').take(pad));

    Ok(AlignmentBlock {
        mobile,
        markers,
        reference,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const REPORT: &str = concat!(
        "\n",
        " *********************************************************************\n",
        " * TM-align (Version 20190822): protein structure alignment          *\n",
        " *********************************************************************\n",
        "\n",
        "Name of Chain_1: 2xyz_ChainA.pdb (to be superimposed onto Chain_2)\n",
        "Name of Chain_2: 1abc_ChainA.pdb\n",
        "Length of Chain_1: 7 residues\n",
        "Length of Chain_2: 7 residues\n",
        "\n",
        "Aligned length=    6, RMSD=   1.23, Seq_ID=n_identical/n_aligned= 0.667\n",
        "TM-score= 0.71234 (if normalized by length of Chain_1, i.e., LN=7, d0=0.50)\n",
        "TM-score= 0.70111 (if normalized by length of Chain_2, i.e., LN=7, d0=0.50)\n",
        "(You should use TM-score normalized by length of the reference structure)\n",
        "\n",
        "(\":\" denotes residue pairs of d <  5.0 Angstrom, \".\" denotes other aligned residues)\n",
        "MKV-LAGT\n",
        "::: ..:\n",
        "MKVALS-T\n",
        "\n",
        "#Total CPU time is  0.01 seconds\n",
    );

    #[test]
    fn parses_statistics() {
        let r = parse_tmalign(REPORT).unwrap();
        assert_eq!(r.aligned_length, Some(6));
        assert_eq!(r.rmsd, Some(1.23));
        assert_eq!(r.seq_identity, Some(0.667));
        assert_eq!(r.tm_scores, vec![0.71234, 0.70111]);
        assert!(r.within_rmsd(3.0));
        assert!(r.within_rmsd(1.23));
        assert!(!r.within_rmsd(1.0));
        assert!((r.score() - 0.70111).abs() < 1e-10);
    }

    #[test]
    fn parses_alignment_block_and_pads_markers() {
        let block = parse_tmalign(REPORT).unwrap().alignment.unwrap();
        assert_eq!(block.mobile, "MKV-LAGT");
        assert_eq!(block.reference, "MKVALS-T");
        assert_eq!(block.markers, "::: ..: ");
        assert_eq!(block.len(), 8);
        let cols: Vec<_> = block.columns().collect();
        assert_eq!(cols[3], ('-', ' ', 'A'));
    }

    #[test]
    fn leading_marker_spaces_are_kept() {
        let text = "(\":\" denotes residue pairs of d <  5.0 Angstrom)\nABC\n  :\nABD\n";
        let block = parse_tmalign(text).unwrap().alignment.unwrap();
        assert_eq!(block.markers, "  :");
    }

    #[test]
    fn missing_rmsd_never_passes() {
        let r = parse_tmalign("no alignment here\n").unwrap();
        assert_eq!(r.rmsd, None);
        assert!(r.alignment.is_none());
        assert!(!r.within_rmsd(100.0));
    }

    #[test]
    fn truncated_block_is_error() {
        let text = "(\":\" denotes residue pairs of d <  5.0 Angstrom)\nABC\n";
        assert!(parse_tmalign(text).is_err());
    }
}
