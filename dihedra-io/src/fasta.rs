//! FASTA output for chain sequences.

use std::path::Path;

use dihedra_core::Result;

/// A named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

/// Render records as FASTA, one unwrapped sequence line per record.
/// Records with an empty sequence are omitted.
///
/// # Examples
///
/// ```
/// # use dihedra_io::fasta::{write_fasta, FastaRecord};
/// let out = write_fasta(&[FastaRecord { header: "1abc".into(), sequence: "MKV".into() }]);
/// assert_eq!(out, ">1abc\nMKV\n");
/// ```
pub fn write_fasta(records: &[FastaRecord]) -> String {
    let mut out = String::new();
    for r in records.iter().filter(|r| !r.sequence.is_empty()) {
        out.push('>');
        out.push_str(&r.header);
        out.push('\n');
        out.push_str(&r.sequence);
        out.push('\n');
    }
    out
}

pub fn write_fasta_file(path: impl AsRef<Path>, records: &[FastaRecord]) -> Result<()> {
    std::fs::write(path, write_fasta(records))?;
    Ok(())
}
