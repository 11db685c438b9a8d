//! CSV tables exchanged between pipeline steps.
//!
//! Writers emit a header row and one row per record. Readers of delta
//! tables are lenient: a numeric cell that does not parse becomes NaN and is
//! left to the entropy step's invalid-value policy.

use std::fs::File;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use dihedra_core::{AnglePair, DihedraError, Result};
use dihedra_stats::{DeltaRecord, EntropyRecord, EntropyValue, ResidueDelta};
use dihedra_struct::{EnsembleRmsd, ResidueBFactor, SecondaryComposition, SecondaryStructure};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dssp::{AsaRecord, DsspResidue};

/// One row of an aggregated family table: a delta whose target residue is
/// no longer tracked, tagged with the delta file it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedDelta {
    #[serde(rename = "RefResidueNumber")]
    pub ref_residue_position: i32,
    #[serde(rename = "DeltaPhi")]
    pub delta_phi: f64,
    #[serde(rename = "DeltaPsi")]
    pub delta_psi: f64,
    #[serde(rename = "Filename")]
    pub filename: String,
}

impl AggregatedDelta {
    pub fn from_delta(record: &DeltaRecord, filename: impl Into<String>) -> Self {
        Self {
            ref_residue_position: record.ref_residue_position,
            delta_phi: record.delta_phi,
            delta_psi: record.delta_psi,
            filename: filename.into(),
        }
    }
}

impl ResidueDelta for AggregatedDelta {
    fn ref_residue_position(&self) -> i32 {
        self.ref_residue_position
    }

    fn delta_phi(&self) -> f64 {
        self.delta_phi
    }

    fn delta_psi(&self) -> f64 {
        self.delta_psi
    }
}

fn open_reader(path: &Path) -> Result<::csv::Reader<File>> {
    let file = File::open(path).map_err(|e| {
        DihedraError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(file))
}

fn create_writer(path: &Path) -> Result<Writer<File>> {
    let file = File::create(path).map_err(|e| {
        DihedraError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    Ok(WriterBuilder::new().has_headers(true).from_writer(file))
}

fn csv_error(path: &Path, e: ::csv::Error) -> DihedraError {
    DihedraError::Parse(format!("{}: {}", path.display(), e))
}

/// Serialize records under their serde header names.
pub fn write_records<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path)?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;
    debug!("wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}

/// Deserialize every row strictly; any malformed row is an error.
pub fn read_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| csv_error(path, e))
}

/// `ResidueNumber,ResidueName,Phi,Psi`
pub fn write_angles(path: impl AsRef<Path>, angles: &[AnglePair]) -> Result<()> {
    write_records(path, angles)
}

pub fn read_angles(path: impl AsRef<Path>) -> Result<Vec<AnglePair>> {
    read_records(path)
}

/// `RefResidueNumber,TargetResidueNumber,DeltaPhi,DeltaPsi`
pub fn write_deltas(path: impl AsRef<Path>, deltas: &[DeltaRecord]) -> Result<()> {
    write_records(path, deltas)
}

/// Read a delta table, coercing unparseable delta cells to NaN.
///
/// Rows whose residue numbers do not parse are skipped with a warning.
pub fn read_deltas(path: impl AsRef<Path>) -> Result<Vec<DeltaRecord>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let columns = Columns::locate(
        path,
        reader.headers().map_err(|e| csv_error(path, e))?,
        &["RefResidueNumber", "TargetResidueNumber", "DeltaPhi", "DeltaPsi"],
    )?;

    let mut out = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let (Some(r), Some(t)) = (columns.int(&record, 0), columns.int(&record, 1)) else {
            warn!("{}: row {} has no usable residue numbers, skipped", path.display(), line + 2);
            continue;
        };
        out.push(DeltaRecord {
            ref_residue_position: r,
            target_residue_position: t,
            delta_phi: columns.lenient_f64(&record, 2),
            delta_psi: columns.lenient_f64(&record, 3),
        });
    }
    Ok(out)
}

/// `RefResidueNumber,DeltaPhi,DeltaPsi,Filename`
pub fn write_aggregated(path: impl AsRef<Path>, rows: &[AggregatedDelta]) -> Result<()> {
    write_records(path, rows)
}

/// Read an aggregated table with the same leniency as [`read_deltas`].
/// A missing `Filename` column is tolerated.
pub fn read_aggregated(path: impl AsRef<Path>) -> Result<Vec<AggregatedDelta>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let columns = Columns::locate(path, &headers, &["RefResidueNumber", "DeltaPhi", "DeltaPsi"])?;
    let filename = headers.iter().position(|h| h == "Filename");

    let mut out = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let Some(r) = columns.int(&record, 0) else {
            warn!("{}: row {} has no usable residue number, skipped", path.display(), line + 2);
            continue;
        };
        out.push(AggregatedDelta {
            ref_residue_position: r,
            delta_phi: columns.lenient_f64(&record, 1),
            delta_psi: columns.lenient_f64(&record, 2),
            filename: filename
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string(),
        });
    }
    Ok(out)
}

/// `RefResidueNumber,PhiEntropy,PsiEntropy`; undefined entropies are empty cells.
pub fn write_entropy(path: impl AsRef<Path>, records: &[EntropyRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path)?;
    writer
        .write_record(["RefResidueNumber", "PhiEntropy", "PsiEntropy"])
        .map_err(|e| csv_error(path, e))?;
    for r in records {
        writer
            .write_record([
                r.ref_residue_position.to_string(),
                entropy_cell(r.phi_entropy),
                entropy_cell(r.psi_entropy),
            ])
            .map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read an entropy table; empty or NaN cells come back as undefined.
pub fn read_entropy(path: impl AsRef<Path>) -> Result<Vec<EntropyRecord>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let columns = Columns::locate(
        path,
        reader.headers().map_err(|e| csv_error(path, e))?,
        &["RefResidueNumber", "PhiEntropy", "PsiEntropy"],
    )?;
    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let position = columns.int(&record, 0).ok_or_else(|| {
            DihedraError::Parse(format!("{}: bad residue number", path.display()))
        })?;
        out.push(EntropyRecord {
            ref_residue_position: position,
            phi_entropy: lenient_entropy(columns.lenient_f64(&record, 1)),
            psi_entropy: lenient_entropy(columns.lenient_f64(&record, 2)),
        });
    }
    Ok(out)
}

fn entropy_cell(value: EntropyValue) -> String {
    value.value().map(|v| v.to_string()).unwrap_or_default()
}

fn lenient_entropy(v: f64) -> EntropyValue {
    EntropyValue::from(Some(v))
}

/// Per-residue classes followed by a percentage section:
///
/// ```text
/// ResidueNumber,AminoAcid,SecondaryStructure
/// ...
///
///
/// Secondary Structure Percentages
/// SecondaryStructure,Percentage
/// Helix,40
/// ...
/// ```
pub fn write_secondary_structure(path: impl AsRef<Path>, residues: &[DsspResidue]) -> Result<()> {
    let path = path.as_ref();
    let csv_err = |e| csv_error(path, e);

    let mut body = Writer::from_writer(Vec::new());
    body.write_record(["ResidueNumber", "AminoAcid", "SecondaryStructure"])
        .map_err(csv_err)?;
    for r in residues {
        body.write_record([
            r.residue_number.to_string(),
            r.amino_acid.to_string(),
            r.class().label().to_string(),
        ])
        .map_err(csv_err)?;
    }
    let mut bytes = body
        .into_inner()
        .map_err(|e| DihedraError::Other(e.to_string()))?;

    let composition = SecondaryComposition::from_classes(residues.iter().map(|r| r.class()));
    if composition.total() > 0 {
        bytes.extend_from_slice(b"\n\nSecondary Structure Percentages\n");
        let mut section = Writer::from_writer(Vec::new());
        section
            .write_record(["SecondaryStructure", "Percentage"])
            .map_err(csv_err)?;
        for ss in SecondaryStructure::ALL {
            let pct = composition.percentage(ss).unwrap_or(0.0);
            section
                .write_record([ss.label().to_string(), pct.to_string()])
                .map_err(csv_err)?;
        }
        bytes.extend(
            section
                .into_inner()
                .map_err(|e| DihedraError::Other(e.to_string()))?,
        );
    } else {
        warn!("{}: no residues, percentage section omitted", path.display());
    }

    std::fs::write(path, bytes)?;
    Ok(())
}

/// `Residue_Number,Residue_Type,ASA`, with `NA` for missing accessibility.
pub fn write_asa(path: impl AsRef<Path>, rows: &[AsaRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path)?;
    writer
        .write_record(["Residue_Number", "Residue_Type", "ASA"])
        .map_err(|e| csv_error(path, e))?;
    for r in rows {
        let asa = r.asa.map(|v| v.to_string()).unwrap_or_else(|| "NA".into());
        writer
            .write_record([r.residue_number.to_string(), r.residue_type.to_string(), asa])
            .map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

/// `Model,Chain,ResidueName,ResidueNumber,AverageBFactor`
pub fn write_b_factors(path: impl AsRef<Path>, rows: &[ResidueBFactor]) -> Result<()> {
    write_records(path, rows)
}

/// `Residue,Amino_Acid,RMSD:<model>...,Mean_RMSD`; missing values are empty.
pub fn write_ensemble_rmsd(path: impl AsRef<Path>, table: &EnsembleRmsd) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path)?;

    let mut header = vec!["Residue".to_string(), "Amino_Acid".to_string()];
    header.extend(table.models.iter().map(|m| format!("RMSD:{}", m)));
    header.push("Mean_RMSD".into());
    writer.write_record(&header).map_err(|e| csv_error(path, e))?;

    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for row in &table.residues {
        let mut fields = vec![row.residue_number.to_string(), row.residue_name.clone()];
        fields.extend(row.per_model.iter().map(|v| cell(*v)));
        fields.push(cell(row.mean()));
        writer.write_record(&fields).map_err(|e| csv_error(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

/// Column positions of required headers in a table.
struct Columns {
    indices: Vec<usize>,
}

impl Columns {
    fn locate(path: &Path, headers: &StringRecord, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| {
                headers.iter().position(|h| h == *name).ok_or_else(|| {
                    DihedraError::Parse(format!("{}: missing column {}", path.display(), name))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: usize) -> &'r str {
        record.get(self.indices[column]).unwrap_or("")
    }

    /// Residue numbers may have been written as floats (`12.0`) by other tools.
    fn int(&self, record: &StringRecord, column: usize) -> Option<i32> {
        let cell = self.cell(record, column);
        cell.parse::<i32>().ok().or_else(|| {
            cell.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i32)
        })
    }

    fn lenient_f64(&self, record: &StringRecord, column: usize) -> f64 {
        let cell = self.cell(record, column);
        cell.parse::<f64>().unwrap_or_else(|_| {
            if !cell.is_empty() {
                debug!("coercing unparseable value {:?} to NaN", cell);
            }
            f64::NAN
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn angles_round_trip_through_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1abc_ChainA_angles.csv");
        let angles = vec![
            AnglePair::new(2, 'G', -63.5, -41.25),
            AnglePair::new(3, 'V', -120.0, 130.0),
        ];
        write_angles(&path, &angles).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ResidueNumber,ResidueName,Phi,Psi\n"));
        assert!(text.contains("2,G,-63.5,-41.25"));

        assert_eq!(read_angles(&path).unwrap(), angles);
    }

    #[test]
    fn delta_reader_coerces_bad_cells_to_nan() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "RefResidueNumber,TargetResidueNumber,DeltaPhi,DeltaPsi").unwrap();
        writeln!(file, "5,15,10.5,abc").unwrap();
        writeln!(file, "6,16,,3.0").unwrap();
        writeln!(file, "x,17,1.0,1.0").unwrap();
        writeln!(file, "7.0,18,2.0,2.0").unwrap();
        file.flush().unwrap();

        let deltas = read_deltas(file.path()).unwrap();
        assert_eq!(deltas.len(), 3);
        assert!((deltas[0].delta_phi - 10.5).abs() < 1e-10);
        assert!(deltas[0].delta_psi.is_nan());
        assert!(deltas[1].delta_phi.is_nan());
        assert_eq!(deltas[2].ref_residue_position, 7);
    }

    #[test]
    fn delta_reader_requires_columns() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "RefResidueNumber,DeltaPhi").unwrap();
        writeln!(file, "1,2.0").unwrap();
        file.flush().unwrap();
        let err = read_deltas(file.path()).unwrap_err();
        assert!(err.to_string().contains("TargetResidueNumber"));
    }

    #[test]
    fn aggregated_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kinase.csv");
        let d = DeltaRecord {
            ref_residue_position: 4,
            target_residue_position: 9,
            delta_phi: 12.0,
            delta_psi: 0.5,
        };
        let rows = vec![AggregatedDelta::from_delta(&d, "a_vs_b_delta_phi_psi.csv")];
        write_aggregated(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("RefResidueNumber,DeltaPhi,DeltaPsi,Filename\n"));
        assert_eq!(read_aggregated(&path).unwrap(), rows);
    }

    #[test]
    fn entropy_undefined_is_empty_cell() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entropy_x.csv");
        let records = vec![
            EntropyRecord {
                ref_residue_position: 5,
                phi_entropy: EntropyValue::Defined(1.0),
                psi_entropy: EntropyValue::Defined(0.0),
            },
            EntropyRecord {
                ref_residue_position: 9,
                phi_entropy: EntropyValue::Undefined,
                psi_entropy: EntropyValue::Defined(0.0),
            },
        ];
        write_entropy(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "RefResidueNumber,PhiEntropy,PsiEntropy\n5,1,0\n9,,0\n");
        assert_eq!(read_entropy(&path).unwrap(), records);
    }

    #[test]
    fn asa_writes_na() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x_asa.csv");
        let rows = vec![
            AsaRecord {
                residue_number: 1,
                residue_type: 'M',
                asa: Some(120.0),
            },
            AsaRecord {
                residue_number: 2,
                residue_type: 'K',
                asa: None,
            },
        ];
        write_asa(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Residue_Number,Residue_Type,ASA\n1,M,120\n2,K,NA\n");
    }

    #[test]
    fn ensemble_rmsd_columns() {
        use dihedra_struct::ResidueRmsd;

        let dir = tempdir().unwrap();
        let path = dir.path().join("rmsd.csv");
        let table = EnsembleRmsd {
            models: vec![2, 3],
            residues: vec![ResidueRmsd {
                residue_number: 1,
                residue_name: "GLY".into(),
                per_model: vec![Some(1.0), None],
            }],
        };
        write_ensemble_rmsd(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Residue,Amino_Acid,RMSD:2,RMSD:3,Mean_RMSD\n1,GLY,1,,1\n");
    }
}
