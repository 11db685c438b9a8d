//! Pipeline steps. Each step reads files from an input path (one file or a
//! directory), writes its results into an output directory and reports what
//! it did in a [`StepSummary`].

pub mod alignment;
pub mod annotation;
pub mod ensemble;
pub mod pipeline;
pub mod structure;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Files written and inputs skipped by one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
}

impl StepSummary {
    pub(crate) fn wrote(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    pub(crate) fn skip(&mut self) {
        self.skipped += 1;
    }
}

/// Files under `input` accepted by `accept`, sorted by name. A file path is
/// returned as-is when accepted.
pub(crate) fn list_files(input: &Path, accept: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(if accept(input) { vec![input.to_path_buf()] } else { Vec::new() });
    }
    let entries = fs::read_dir(input)
        .with_context(|| format!("cannot list {}", input.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("cannot list {}", input.display()))?
            .path();
        if path.is_file() && accept(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Subdirectories of `dir`, sorted by name.
pub(crate) fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("cannot list {}", dir.display()))?
            .path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub(crate) fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))
}

/// File name with any `.gz` and then one extension removed.
pub(crate) fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// `.pdb` or `.ent`, optionally gzip-compressed.
pub(crate) fn is_pdb(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    name.ends_with(".pdb") || name.ends_with(".ent")
}

pub(crate) fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Three-residue alanine chain with full backbones.
    pub(crate) const TRIPEPTIDE: &str = concat!(
        "ATOM      1  N   ALA A   1      -0.677  -1.230  -0.491  1.00 10.00           N\n",
        "ATOM      2  CA  ALA A   1       0.000   0.000   0.000  1.00 12.00           C\n",
        "ATOM      3  C   ALA A   1       1.525   0.000   0.000  1.00 14.00           C\n",
        "ATOM      4  O   ALA A   1       2.152  -1.062   0.000  1.00 16.00           O\n",
        "ATOM      5  N   ALA A   2       2.151   1.174   0.000  1.00 10.00           N\n",
        "ATOM      6  CA  ALA A   2       3.604   1.296   0.000  1.00 12.00           C\n",
        "ATOM      7  C   ALA A   2       4.100   2.741   0.000  1.00 14.00           C\n",
        "ATOM      8  O   ALA A   2       3.302   3.678   0.000  1.00 16.00           O\n",
        "ATOM      9  N   ALA A   3       5.418   2.929   0.000  1.00 10.00           N\n",
        "ATOM     10  CA  ALA A   3       6.010   4.263   0.000  1.00 12.00           C\n",
        "ATOM     11  C   ALA A   3       7.530   4.175   0.000  1.00 14.00           C\n",
        "ATOM     12  O   ALA A   3       8.138   3.106   0.000  1.00 16.00           O\n",
        "TER\n",
        "END\n",
    );

    #[test]
    fn stems() {
        assert_eq!(file_stem(Path::new("dir/1abc.pdb")), "1abc");
        assert_eq!(file_stem(Path::new("1abc.pdb.gz")), "1abc");
        assert_eq!(file_stem(Path::new("1abc_ChainA_angles.csv")), "1abc_ChainA_angles");
        assert_eq!(file_stem(Path::new("noext")), "noext");
    }

    #[test]
    fn pdb_names() {
        assert!(is_pdb(Path::new("a.pdb")));
        assert!(is_pdb(Path::new("a.PDB")));
        assert!(is_pdb(Path::new("pdb1abc.ent.gz")));
        assert!(!is_pdb(Path::new("a.cif")));
        assert!(!is_pdb(Path::new("a.pdb.txt")));
    }

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdb", "a.pdb", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub.pdb")).unwrap();

        let files = list_files(dir.path(), is_pdb).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_stem(p)).collect();
        assert_eq!(names, vec!["a", "b"]);

        let single = list_files(&dir.path().join("a.pdb"), is_pdb).unwrap();
        assert_eq!(single.len(), 1);
        assert!(list_files(&dir.path().join("notes.txt"), is_pdb).unwrap().is_empty());
        assert_eq!(list_dirs(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(list_files(Path::new("/nonexistent/dihedra"), is_pdb).is_err());
    }
}
