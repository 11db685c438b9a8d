//! Family-level aggregation of delta tables and per-residue entropy.

use std::path::Path;

use anyhow::{Context, Result};
use dihedra_io::{tables, AggregatedDelta};
use dihedra_stats::{reduce_entropy, EntropyOptions, FamilyCutoffs};
use log::{debug, info, warn};

use super::alignment::DELTA_SUFFIX;
use super::{create_dir, file_stem, has_suffix, list_dirs, list_files, StepSummary};

/// Concatenate the delta tables of each family subdirectory of `input` into
/// `<output>/<family>.csv`. When `input` has no subdirectories it is treated
/// as a single family named after itself.
pub fn aggregate(input: &Path, output: &Path) -> Result<StepSummary> {
    let mut families = list_dirs(input)?;
    if families.is_empty() {
        families.push(input.to_path_buf());
    }
    create_dir(output)?;

    let mut summary = StepSummary::default();
    for dir in families {
        let family = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ensemble".to_string());
        let out = output.join(format!("{}.csv", family));
        match aggregate_family(&dir, &out)? {
            Some(_) => summary.wrote(out),
            None => summary.skip(),
        }
    }
    Ok(summary)
}

/// Concatenate every delta table in `dir` into `out`, tagging each row with
/// its source file name. Returns the number of rows written, or `None` when
/// no table contributed any.
pub fn aggregate_family(dir: &Path, out: &Path) -> Result<Option<usize>> {
    let mut rows = Vec::new();
    for path in list_files(dir, |p| has_suffix(p, DELTA_SUFFIX))? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match tables::read_deltas(&path) {
            Ok(records) if records.is_empty() => warn!("{} is empty, skipped", path.display()),
            Ok(records) => {
                debug!("{}: {} row(s)", name, records.len());
                rows.extend(records.iter().map(|r| AggregatedDelta::from_delta(r, name.as_str())));
            }
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }
    if rows.is_empty() {
        warn!("no delta rows under {}", dir.display());
        return Ok(None);
    }
    tables::write_aggregated(out, &rows)
        .with_context(|| format!("cannot write {}", out.display()))?;
    info!("{} aggregated row(s) -> {}", rows.len(), out.display());
    Ok(Some(rows.len()))
}

/// Family name of an aggregated table: its stem without an `agg_` prefix.
pub fn family_name(path: &Path) -> String {
    let stem = file_stem(path);
    match stem.strip_prefix("agg_") {
        Some(family) if !family.is_empty() => family.to_string(),
        _ => stem,
    }
}

/// Reduce each aggregated table under `input` to per-residue phi/psi
/// entropies, written as `<output>/entropy_<family>.csv`.
///
/// The family's residue cutoff, if configured, is applied before reduction.
pub fn entropy(
    input: &Path,
    output: &Path,
    options: &EntropyOptions,
    cutoffs: &FamilyCutoffs,
) -> Result<StepSummary> {
    create_dir(output)?;
    let accept = |p: &Path| has_suffix(p, ".csv") && !file_stem(p).starts_with("entropy_");
    let mut summary = StepSummary::default();
    for path in list_files(input, accept)? {
        let family = family_name(&path);
        let mut rows = match tables::read_aggregated(&path) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                summary.skip();
                continue;
            }
        };
        let before = rows.len();
        cutoffs.retain(&family, &mut rows);
        match cutoffs.get(&family) {
            Some(max) => debug!(
                "{}: cutoff {} kept {} of {} row(s)",
                family,
                max,
                rows.len(),
                before
            ),
            None => debug!("{}: no residue cutoff configured", family),
        }

        let records = reduce_entropy(&rows, options)
            .with_context(|| format!("entropy of {}", path.display()))?;
        let out = output.join(format!("entropy_{}.csv", family));
        tables::write_entropy(&out, &records)?;
        info!("{}: entropy of {} residue(s) -> {}", family, records.len(), out.display());
        summary.wrote(out);
    }
    Ok(summary)
}
