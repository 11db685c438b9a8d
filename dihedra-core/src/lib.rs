//! Shared primitives, traits, and records for the dihedra workspace.
//!
//! `dihedra-core` provides the foundation that all other dihedra crates build on:
//!
//! - **Error types**: [`DihedraError`] and [`Result`] for structured error handling
//! - **Traits**: [`Summarizable`], [`Scored`]
//! - **Records**: [`AnglePair`] and [`ResidueAlignment`], the inputs of delta computation
//! - **Compression**: transparent gzip reading of coordinate files (std feature only)

pub mod error;
pub mod records;
pub mod traits;

#[cfg(feature = "std")]
pub mod compress;

pub use error::{DihedraError, Result};
pub use records::{index_angles, AnglePair, ResidueAlignment};
pub use traits::*;
