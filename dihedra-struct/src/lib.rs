//! Protein 3D structures for the dihedra pipeline.
//!
//! - **PDB reading and writing** in [`pdb`], including multi-model ensembles
//!   and gzip-compressed files
//! - **Coordinate geometry** (dihedral, RMSD) in [`geometry`]
//! - **Backbone torsions** phi/psi per residue in [`backbone`]
//! - **Chains and sequences** in [`chain`]
//! - **Secondary structure classes** from DSSP codes in [`secondary`]
//! - **Per-residue metrics**: B-factors in [`bfactor`], CA RMSD across
//!   models in [`rmsd`]
//!
//! # Quick start
//!
//! ```
//! use dihedra_struct::pdb::parse_pdb;
//! use dihedra_core::Summarizable;
//!
//! let pdb_text = "\
//! HEADER                                                        1TST
//! ATOM      1  N   ALA A   1       1.000   2.000   3.000  1.00  0.00           N
//! ATOM      2  CA  ALA A   1       2.000   2.000   3.000  1.00  0.00           C
//! ATOM      3  C   ALA A   1       3.000   2.000   3.000  1.00  0.00           C
//! ATOM      4  O   ALA A   1       3.000   3.000   3.000  1.00  0.00           O
//! TER
//! END
//! ";
//!
//! let structure = parse_pdb(pdb_text).unwrap();
//! assert_eq!(structure.chain_count(), 1);
//! assert!(structure.summary().contains("1TST"));
//! ```

pub mod backbone;
pub mod bfactor;
pub mod chain;
pub mod geometry;
pub mod pdb;
pub mod rmsd;
pub mod secondary;
pub mod types;

pub use backbone::{backbone_dihedrals, chain_angles, structure_angles};
pub use bfactor::{residue_b_factors, ResidueBFactor};
pub use chain::{chain_file_stem, first_chain, residue_codes, sequence};
pub use geometry::{dihedral_points, rmsd_points};
pub use pdb::{parse_pdb, parse_pdb_models, write_chain};
pub use rmsd::{per_residue_ca_rmsd, EnsembleRmsd, ResidueRmsd};
pub use secondary::{DsspState, SecondaryComposition, SecondaryStructure};
pub use types::{one_letter_code, Atom, Chain, Point3D, Residue, Structure};
