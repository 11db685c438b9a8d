//! Secondary structure and solvent accessibility from DSSP.

use std::path::Path;

use anyhow::Result;
use dihedra_io::mapping::split_chain_stem;
use dihedra_io::{asa_records, parse_dssp_file, run_dssp, tables, ExternalTool};
use log::{info, warn};

use super::{create_dir, file_stem, has_suffix, is_pdb, list_files, StepSummary};

fn is_dssp(path: &Path) -> bool {
    has_suffix(path, ".dssp")
}

/// Assign secondary structure to every PDB or `.dssp` file under `input`.
///
/// PDB files are first run through `mkdssp`, leaving `<output>/<stem>.dssp`;
/// existing `.dssp` files are read as they are. Each result is summarised
/// as `<output>/SS_<stem>.csv`. The written `.dssp` files are not listed in
/// the summary.
pub fn secondary_structure(input: &Path, output: &Path, tool: &ExternalTool) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, |p| is_pdb(p) || is_dssp(p))? {
        let stem = file_stem(&path);
        let dssp = if is_dssp(&path) {
            path.clone()
        } else {
            let out = output.join(format!("{}.dssp", stem));
            if let Err(e) = run_dssp(tool, &path, &out) {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
            out
        };
        let residues = match parse_dssp_file(&dssp) {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping {}: {}", dssp.display(), e);
                summary.skip();
                continue;
            }
        };
        let out = output.join(format!("SS_{}.csv", stem));
        tables::write_secondary_structure(&out, &residues)?;
        info!("{} residue(s) classified -> {}", residues.len(), out.display());
        summary.wrote(out);
    }
    Ok(summary)
}

/// Write per-residue accessibility of one chain of every `.dssp` file
/// under `input` as `<output>/<stem>_asa.csv`.
///
/// Without an explicit `chain`, the chain is taken from a
/// `<pdb>_Chain<ID>` stem, falling back to `A`.
pub fn accessibility(input: &Path, output: &Path, chain: Option<char>) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, is_dssp)? {
        let stem = file_stem(&path);
        let chain_id = chain
            .or_else(|| split_chain_stem(&stem).map(|(_, id)| id))
            .unwrap_or('A');
        let residues = match parse_dssp_file(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let rows = asa_records(&residues, chain_id);
        if rows.is_empty() {
            warn!("{} has no residues in chain {}", path.display(), chain_id);
        }
        let out = output.join(format!("{}_asa.csv", stem));
        tables::write_asa(&out, &rows)?;
        info!("ASA of {} residue(s) -> {}", rows.len(), out.display());
        summary.wrote(out);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DSSP: &str = concat!(
        "==== Secondary Structure Definition by the program DSSP, CMBI version 2.0 ==== DATE=2024-01-01        .\n",
        "  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA\n",
        "    1    1 A M              0   0  196      0, 0.0     2,-0.3     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 146.2   10.1   20.2   30.3\n",
        "    2    2 A K  H  >        0   0   92      0, 0.0     4,-2.6     0, 0.0     0, 0.0  -0.934 360.0  55.1 -60.2 -40.1   11.1   21.2   31.3\n",
        "    3    3 A V  E          0   0   xx      0, 0.0     4,-2.6     0, 0.0     0, 0.0  -0.934 360.0  55.1 -60.2 -40.1   11.1   21.2   31.3\n",
        "    4        !              0   0    0      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    0.0    0.0    0.0\n",
        "    5    1 B G  T           0   0   40      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0   12.1   22.2   32.3\n",
    );

    #[test]
    fn classifies_existing_dssp_files() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("1abc_ChainA.dssp");
        fs::write(&input, DSSP).unwrap();

        let out = root.path().join("ss");
        let tool = ExternalTool::new("/nonexistent/mkdssp");
        let summary = secondary_structure(&input, &out, &tool).unwrap();
        assert_eq!(summary.written, vec![out.join("SS_1abc_ChainA.csv")]);

        let text = fs::read_to_string(&summary.written[0]).unwrap();
        assert!(text.starts_with("ResidueNumber,AminoAcid,SecondaryStructure\n1,M,Coil\n2,K,Helix\n"));
        assert!(text.contains("Secondary Structure Percentages"));
        assert!(text.contains("Beta Strand,25"));
    }

    #[test]
    fn missing_mkdssp_skips_pdb_inputs() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("1abc.pdb"), "END\n").unwrap();
        let tool = ExternalTool::new("/nonexistent/mkdssp");
        let summary = secondary_structure(root.path(), &root.path().join("ss"), &tool).unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(summary.skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn runs_mkdssp_on_pdb_inputs() {
        let root = tempfile::tempdir().unwrap();
        let canned = root.path().join("canned.txt");
        fs::write(&canned, DSSP).unwrap();
        let script = root.path().join("fake_mkdssp.sh");
        fs::write(&script, format!("cp '{}' \"$2\"\n", canned.display())).unwrap();
        let input = root.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("1abc.pdb"), "END\n").unwrap();

        let out = root.path().join("ss");
        let tool = ExternalTool::new("sh").with_args([script.to_string_lossy().into_owned()]);
        let summary = secondary_structure(&input, &out, &tool).unwrap();
        assert_eq!(summary.written, vec![out.join("SS_1abc.csv")]);
        assert!(out.join("1abc.dssp").is_file());
    }

    #[test]
    fn accessibility_per_chain() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("dssp");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("1abc_ChainB.dssp"), DSSP).unwrap();
        fs::write(dir.join("2xyz.dssp"), DSSP).unwrap();

        let out = root.path().join("asa");
        let summary = accessibility(&dir, &out, None).unwrap();
        assert_eq!(summary.written.len(), 2);

        let chain_b = fs::read_to_string(out.join("1abc_ChainB_asa.csv")).unwrap();
        assert_eq!(chain_b, "Residue_Number,Residue_Type,ASA\n1,G,40\n");
        let chain_a = fs::read_to_string(out.join("2xyz_asa.csv")).unwrap();
        assert_eq!(chain_a, "Residue_Number,Residue_Type,ASA\n1,M,196\n2,K,92\n3,V,NA\n");

        accessibility(&dir, &out, Some('A')).unwrap();
        let forced = fs::read_to_string(out.join("1abc_ChainB_asa.csv")).unwrap();
        assert!(forced.ends_with("3,V,NA\n"));
    }
}
