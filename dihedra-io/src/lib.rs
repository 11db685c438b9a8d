//! File formats and external tools of the dihedra pipeline.
//!
//! - **Tables**: CSV readers/writers for angle, delta, aggregated, entropy,
//!   secondary structure, ASA, B-factor and RMSD tables in [`tables`]
//! - **TM-align**: report and alignment-block parser in [`tmalign`]
//! - **Residue mapping**: aligned residue pairs as text in [`mapping`]
//! - **DSSP**: classic fixed-column output in [`dssp`]
//! - **FASTA** writer in [`fasta`]
//! - **External tools**: `TMalign` and `mkdssp` runners in [`tools`]

pub mod dssp;
pub mod fasta;
pub mod mapping;
pub mod tables;
pub mod tmalign;
pub mod tools;

pub use dssp::{asa_records, parse_dssp, parse_dssp_file, AsaRecord, DsspResidue};
pub use fasta::{write_fasta, write_fasta_file, FastaRecord};
pub use mapping::{format_mapping, map_residues, parse_mapping, MappingLine};
pub use tables::AggregatedDelta;
pub use tmalign::{parse_tmalign, AlignmentBlock, TmAlignReport};
pub use tools::{run_dssp, run_tmalign, ExternalTool};
