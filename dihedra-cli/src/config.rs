//! TOML configuration for pipeline runs.
//!
//! ```toml
//! [entropy]
//! bins = 60
//! range_min = 0.0
//! range_max = 360.0
//! on_invalid = "drop"            # or "fail", or { substitute = 0.0 }
//!
//! [tools]
//! tmalign = "TMalign"
//! tmalign_args = []
//! dssp = "mkdssp"
//! dssp_args = []
//!
//! [alignment]
//! max_rmsd = 3.0
//!
//! [families]
//! KRAS = 166
//! Lysozyme-C = 146
//! ```
//!
//! Every section is optional and falls back to the defaults shown.

use std::path::Path;

use dihedra_core::{DihedraError, Result};
use dihedra_io::ExternalTool;
use dihedra_stats::entropy::DEFAULT_BINS;
use dihedra_stats::{Binning, EntropyOptions, FamilyCutoffs, InvalidPolicy};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub entropy: EntropyConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Family name → largest reference residue number kept.
    #[serde(default)]
    pub families: FamilyCutoffs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    pub bins: usize,
    pub range_min: f64,
    pub range_max: f64,
    pub on_invalid: InvalidPolicy,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            range_min: 0.0,
            range_max: 360.0,
            on_invalid: InvalidPolicy::Drop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub tmalign: String,
    pub tmalign_args: Vec<String>,
    pub dssp: String,
    /// Extra arguments for mkdssp, e.g. `["--output-format", "dssp"]` for 4.x.
    pub dssp_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tmalign: "TMalign".into(),
            tmalign_args: Vec::new(),
            dssp: "mkdssp".into(),
            dssp_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// TM-align reports with a larger RMSD (Å) are discarded.
    pub max_rmsd: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self { max_rmsd: 3.0 }
    }
}

impl Config {
    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DihedraError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse and validate TOML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| DihedraError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.binning()
            .map_err(|e| DihedraError::Config(format!("[entropy] {}", e)))?;
        if let InvalidPolicy::Substitute(v) = self.entropy.on_invalid {
            if !v.is_finite() {
                return Err(DihedraError::Config(format!(
                    "[entropy] substitute value must be finite, got {}",
                    v
                )));
            }
        }
        if !(self.alignment.max_rmsd.is_finite() && self.alignment.max_rmsd >= 0.0) {
            return Err(DihedraError::Config(format!(
                "[alignment] max_rmsd must be a non-negative number, got {}",
                self.alignment.max_rmsd
            )));
        }
        if self.tools.tmalign.trim().is_empty() || self.tools.dssp.trim().is_empty() {
            return Err(DihedraError::Config("[tools] program names must not be empty".into()));
        }
        Ok(())
    }

    pub fn binning(&self) -> Result<Binning> {
        Binning::new(self.entropy.bins, self.entropy.range_min, self.entropy.range_max)
    }

    pub fn entropy_options(&self) -> Result<EntropyOptions> {
        Ok(EntropyOptions {
            binning: self.binning()?,
            on_invalid: self.entropy.on_invalid,
        })
    }

    pub fn tmalign(&self) -> ExternalTool {
        ExternalTool::new(&self.tools.tmalign).with_args(self.tools.tmalign_args.iter().cloned())
    }

    pub fn dssp(&self) -> ExternalTool {
        ExternalTool::new(&self.tools.dssp).with_args(self.tools.dssp_args.iter().cloned())
    }
}
