//! The whole analysis in one go, under a single output directory:
//!
//! ```text
//! <output>/
//!   pdb_chain/        first chain of each input structure
//!   dihedral/         backbone phi/psi per chain
//!   tm_output/        TM-align reports onto the reference
//!   residue_mapping/  aligned residue pairs
//!   delta/            circular phi/psi deltas per pair
//!   entropy/          aggregated deltas and per-residue entropy
//!   rmsd/             per-residue CA RMSD of multi-model inputs
//!   dssp/             DSSP files and secondary structure tables
//!   asa/              per-residue accessibility
//!   b_factors/        per-residue B-factors of the extracted chains
//!   run_summary.json
//! ```
//!
//! Extracted chain files hold the first model only, so the RMSD step reads
//! the original inputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dihedra_struct::chain_file_stem;
use log::info;
use serde::Serialize;

use super::{
    alignment, annotation, create_dir, ensemble, file_stem, is_pdb, list_files, structure,
    StepSummary,
};
use crate::config::Config;

/// Outcome of [`run`], also written as `run_summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reference: PathBuf,
    pub ensemble: String,
    pub steps: BTreeMap<&'static str, StepSummary>,
}

/// Run every step on the PDB files under `input`.
///
/// `reference` names one of the inputs (by path or file name); without it
/// the first input in name order is used. Deltas of all kept alignments
/// form one ensemble named after the reference.
pub fn run(
    config: &Config,
    input: &Path,
    reference: Option<&Path>,
    output: &Path,
) -> Result<RunSummary> {
    let inputs = list_files(input, is_pdb)?;
    if inputs.is_empty() {
        bail!("no PDB files under {}", input.display());
    }
    let reference = pick_reference(&inputs, reference)?;
    let ensemble_name = file_stem(&reference);
    info!("{} structure(s), reference {}", inputs.len(), reference.display());

    let dir = |name: &str| output.join(name);
    let mut steps = BTreeMap::new();

    let chains = structure::extract_chains(input, &dir("pdb_chain"))?;
    let reference_chain = chains
        .written
        .iter()
        .find(|p| is_chain_of(p, &ensemble_name))
        .cloned()
        .with_context(|| {
            format!("no chain could be extracted from reference {}", reference.display())
        })?;
    steps.insert("extract_chain", chains);

    steps.insert(
        "angles",
        structure::backbone_angles(&dir("pdb_chain"), &dir("dihedral"))?,
    );
    steps.insert(
        "tmalign",
        alignment::tmalign(
            &dir("pdb_chain"),
            &reference_chain,
            &dir("tm_output"),
            &config.tmalign(),
            config.alignment.max_rmsd,
        )?,
    );
    steps.insert(
        "map",
        alignment::residue_mapping(&dir("tm_output"), &dir("pdb_chain"), &dir("residue_mapping"))?,
    );
    steps.insert(
        "delta",
        alignment::deltas(&dir("residue_mapping"), &dir("dihedral"), &dir("delta"))?,
    );

    create_dir(&dir("entropy"))?;
    let aggregated = dir("entropy").join(format!("agg_{}.csv", ensemble_name));
    let entropy = if ensemble::aggregate_family(&dir("delta"), &aggregated)?.is_some() {
        let mut step = ensemble::entropy(
            &aggregated,
            &dir("entropy"),
            &config.entropy_options()?,
            &config.families,
        )?;
        step.written.insert(0, aggregated);
        step
    } else {
        let mut step = StepSummary::default();
        step.skip();
        step
    };
    steps.insert("entropy", entropy);
    steps.insert("rmsd", structure::ensemble_rmsd(input, &dir("rmsd"))?);

    steps.insert(
        "dssp",
        annotation::secondary_structure(&dir("pdb_chain"), &dir("dssp"), &config.dssp())?,
    );
    steps.insert("asa", annotation::accessibility(&dir("dssp"), &dir("asa"), None)?);
    steps.insert("bfactor", structure::b_factors(&dir("pdb_chain"), &dir("b_factors"))?);

    let summary = RunSummary {
        reference,
        ensemble: ensemble_name,
        steps,
    };
    let path = output.join("run_summary.json");
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
    info!("run complete, summary in {}", path.display());
    Ok(summary)
}

fn pick_reference(inputs: &[PathBuf], requested: Option<&Path>) -> Result<PathBuf> {
    let Some(requested) = requested else {
        return Ok(inputs[0].clone());
    };
    inputs
        .iter()
        .find(|p| *p == requested || p.file_name() == Some(requested.as_os_str()))
        .cloned()
        .with_context(|| format!("reference {} is not among the inputs", requested.display()))
}

/// Whether `path` is a chain file extracted from the structure `stem`.
fn is_chain_of(path: &Path, stem: &str) -> bool {
    let name = file_stem(path);
    name.chars()
        .last()
        .is_some_and(|id| name == chain_file_stem(stem, id))
}
