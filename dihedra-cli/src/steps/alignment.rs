//! Structural alignment, residue mapping and per-residue angle deltas.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dihedra_core::Scored;
use dihedra_io::mapping::{split_chain_stem, split_pair_stem, MAPPING_SUFFIX};
use dihedra_io::{
    format_mapping, map_residues, parse_mapping, parse_tmalign, run_tmalign, tables, ExternalTool,
};
use dihedra_stats::compute_deltas;
use dihedra_struct::pdb::parse_pdb_file;
use dihedra_struct::{first_chain, residue_codes, Chain};
use log::{debug, info, warn};

use super::{create_dir, file_stem, has_suffix, is_pdb, list_files, StepSummary};

/// Suffix of per-pair delta tables.
pub const DELTA_SUFFIX: &str = "_delta_phi_psi.csv";

/// Align every PDB under `input` onto `reference` with TM-align and keep
/// the reports whose RMSD is at most `max_rmsd`, as
/// `<output>/<mobile>_vs_<reference>.txt`. The reference itself is skipped.
pub fn tmalign(
    input: &Path,
    reference: &Path,
    output: &Path,
    tool: &ExternalTool,
    max_rmsd: f64,
) -> Result<StepSummary> {
    create_dir(output)?;
    let ref_stem = file_stem(reference);
    let mut summary = StepSummary::default();
    for mobile in list_files(input, is_pdb)? {
        if same_file(&mobile, reference) {
            debug!("not aligning reference {} onto itself", reference.display());
            continue;
        }
        let text = run_tmalign(tool, &mobile, reference)
            .with_context(|| format!("aligning {}", mobile.display()))?;
        let report = match parse_tmalign(&text) {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping {}: {}", mobile.display(), e);
                summary.skip();
                continue;
            }
        };
        if !report.within_rmsd(max_rmsd) {
            info!(
                "discarding {}: RMSD {} exceeds {}",
                mobile.display(),
                report.rmsd.map_or_else(|| "n/a".to_string(), |r| r.to_string()),
                max_rmsd
            );
            summary.skip();
            continue;
        }
        debug!("{}: TM-score {:.4}", mobile.display(), report.score());
        let out = output.join(format!("{}_vs_{}.txt", file_stem(&mobile), ref_stem));
        fs::write(&out, text).with_context(|| format!("cannot write {}", out.display()))?;
        summary.wrote(out);
    }
    info!(
        "{} alignment(s) kept, {} discarded",
        summary.written.len(),
        summary.skipped
    );
    Ok(summary)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Turn each TM-align report `<mobile>_vs_<reference>.txt` under `input`
/// into `<output>/<mobile>_vs_<reference>_residue_mapping.txt`, reading
/// both chains from `pdb_dir/<name>.pdb`.
pub fn residue_mapping(input: &Path, pdb_dir: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, |p| has_suffix(p, ".txt") && !has_suffix(p, MAPPING_SUFFIX))? {
        let stem = file_stem(&path);
        match map_report(&path, &stem, pdb_dir) {
            Ok(text) => {
                let out = output.join(format!("{}{}", stem, MAPPING_SUFFIX));
                fs::write(&out, text).with_context(|| format!("cannot write {}", out.display()))?;
                summary.wrote(out);
            }
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                summary.skip();
            }
        }
    }
    Ok(summary)
}

fn map_report(path: &Path, stem: &str, pdb_dir: &Path) -> Result<String> {
    let (mobile, reference) = split_pair_stem(stem)
        .with_context(|| format!("{} is not named <mobile>_vs_<reference>", stem))?;
    let mobile_chain = load_chain(pdb_dir, mobile)?;
    let reference_chain = load_chain(pdb_dir, reference)?;

    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let block = parse_tmalign(&text)?
        .alignment
        .context("report has no alignment block")?;
    let lines = map_residues(
        &block,
        &residue_codes(&mobile_chain),
        &residue_codes(&reference_chain),
    );
    debug!("{}: {} aligned column(s)", stem, lines.len());
    Ok(format_mapping(&lines))
}

/// The chain named by a `<pdb>_Chain<ID>` file stem, or the first chain
/// when the stem carries no chain ID.
fn load_chain(pdb_dir: &Path, name: &str) -> Result<Chain> {
    let path = pdb_dir.join(format!("{}.pdb", name));
    let structure = parse_pdb_file(&path).with_context(|| format!("loading {}", path.display()))?;
    let chain = match split_chain_stem(name) {
        Some((_, id)) => structure.get_chain(id),
        None => first_chain(&structure),
    };
    chain
        .cloned()
        .with_context(|| format!("{} has no matching chain", path.display()))
}

/// Compute circular phi/psi deltas for every mapping file
/// `<a>_vs_<b>_residue_mapping.txt` under `input`, using
/// `angles_dir/<a>_angles.csv` as the reference side and
/// `angles_dir/<b>_angles.csv` as the target. Output:
/// `<output>/<a>_vs_<b>_delta_phi_psi.csv`.
pub fn deltas(input: &Path, angles_dir: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, |p| has_suffix(p, MAPPING_SUFFIX))? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pair = name.trim_end_matches(MAPPING_SUFFIX);
        let Some((reference, target)) = split_pair_stem(pair) else {
            warn!("skipping {}: not named <a>_vs_<b>{}", path.display(), MAPPING_SUFFIX);
            summary.skip();
            continue;
        };

        let ref_angles = angles_dir.join(format!("{}_angles.csv", reference));
        let target_angles = angles_dir.join(format!("{}_angles.csv", target));
        if !ref_angles.is_file() || !target_angles.is_file() {
            warn!(
                "skipping {}: angle file missing for {} or {}",
                path.display(),
                reference,
                target
            );
            summary.skip();
            continue;
        }

        let alignment = match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| parse_mapping(&text).map_err(Into::into))
        {
            Ok(a) => a,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let (ref_rows, target_rows) =
            match (tables::read_angles(&ref_angles), tables::read_angles(&target_angles)) {
                (Ok(r), Ok(t)) => (r, t),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("skipping {}: {}", path.display(), e);
                    summary.skip();
                    continue;
                }
            };
        let records = compute_deltas(&alignment, &ref_rows, &target_rows);
        let out = output.join(format!("{}{}", pair, DELTA_SUFFIX));
        tables::write_deltas(&out, &records)?;
        info!(
            "{}: {} of {} mapped residue(s) have angles on both sides",
            pair,
            records.len(),
            alignment.len()
        );
        summary.wrote(out);
    }
    Ok(summary)
}
