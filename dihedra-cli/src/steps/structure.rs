//! Steps that work on coordinate files: chain extraction, backbone angles,
//! B-factors, per-residue RMSD and sequences.

use std::path::Path;

use anyhow::{Context, Result};
use dihedra_io::tables;
use dihedra_io::{write_fasta_file, FastaRecord};
use dihedra_struct::pdb::{parse_pdb_file, parse_pdb_models_file, write_chain_file};
use dihedra_struct::{
    chain_file_stem, first_chain, per_residue_ca_rmsd, residue_b_factors, sequence,
    structure_angles,
};
use log::{info, warn};

use super::{create_dir, file_stem, is_pdb, list_files, StepSummary};

/// Write the first chain of each PDB under `input` as
/// `<output>/<stem>_Chain<ID>.pdb`.
pub fn extract_chains(input: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, is_pdb)? {
        let structure = match parse_pdb_file(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let Some(chain) = first_chain(&structure) else {
            warn!("skipping {}: no chains", path.display());
            summary.skip();
            continue;
        };
        let out = output.join(format!("{}.pdb", chain_file_stem(&file_stem(&path), chain.id)));
        write_chain_file(chain, &out).with_context(|| format!("cannot write {}", out.display()))?;
        info!(
            "chain {} of {} ({} residues) -> {}",
            chain.id,
            path.display(),
            chain.residue_count(),
            out.display()
        );
        summary.wrote(out);
    }
    Ok(summary)
}

/// Write backbone phi/psi of every PDB under `input` as
/// `<output>/<stem>_angles.csv`.
pub fn backbone_angles(input: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, is_pdb)? {
        let structure = match parse_pdb_file(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let angles = structure_angles(&structure);
        if angles.is_empty() {
            warn!("{} has no residue with both phi and psi", path.display());
        }
        let out = output.join(format!("{}_angles.csv", file_stem(&path)));
        tables::write_angles(&out, &angles)?;
        info!("{} angle pair(s) -> {}", angles.len(), out.display());
        summary.wrote(out);
    }
    Ok(summary)
}

/// Write per-residue mean B-factors of every model of every PDB under
/// `input` as `<output>/<stem>.csv`. Files without any usable atom are
/// skipped.
pub fn b_factors(input: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, is_pdb)? {
        let rows = match parse_pdb_models_file(&path) {
            Ok(models) => residue_b_factors(&models),
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        if rows.is_empty() {
            warn!("no B-factors found in {}", path.display());
            summary.skip();
            continue;
        }
        let out = output.join(format!("{}.csv", file_stem(&path)));
        tables::write_b_factors(&out, &rows)?;
        info!("B-factors of {} residue(s) -> {}", rows.len(), out.display());
        summary.wrote(out);
    }
    Ok(summary)
}

/// Per-residue CA RMSD of each model against the first, for every
/// multi-model PDB under `input`, written as
/// `<output>/results_mean_RMSD_<stem>.csv`.
pub fn ensemble_rmsd(input: &Path, output: &Path) -> Result<StepSummary> {
    create_dir(output)?;
    let mut summary = StepSummary::default();
    for path in list_files(input, is_pdb)? {
        let models = match parse_pdb_models_file(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        if models.len() < 2 {
            warn!("skipping {}: needs at least two models, found {}", path.display(), models.len());
            summary.skip();
            continue;
        }
        let table = per_residue_ca_rmsd(&models);
        let out = output.join(format!("results_mean_RMSD_{}.csv", file_stem(&path)));
        tables::write_ensemble_rmsd(&out, &table)?;
        info!(
            "RMSD of {} residue(s) over {} model(s) -> {}",
            table.residues.len(),
            table.models.len(),
            out.display()
        );
        summary.wrote(out);
    }
    Ok(summary)
}

/// Collect the chain `chain_id` sequence of every PDB under `input` into
/// one FASTA file at `output`, one record per file named after its stem.
pub fn sequences(input: &Path, output: &Path, chain_id: char) -> Result<StepSummary> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    let mut summary = StepSummary::default();
    let mut records = Vec::new();
    for path in list_files(input, is_pdb)? {
        let structure = match parse_pdb_file(&path) {
            Ok(s) => s,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let seq = structure.get_chain(chain_id).map(sequence).unwrap_or_default();
        if seq.is_empty() {
            warn!("{} has no amino acids in chain {}", path.display(), chain_id);
            summary.skip();
            continue;
        }
        records.push(FastaRecord {
            header: file_stem(&path),
            sequence: seq,
        });
    }
    write_fasta_file(output, &records)
        .with_context(|| format!("cannot write {}", output.display()))?;
    info!("{} sequence(s) -> {}", records.len(), output.display());
    summary.wrote(output.to_path_buf());
    Ok(summary)
}
