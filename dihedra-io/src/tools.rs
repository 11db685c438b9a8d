//! Runners for the external programs the pipeline shells out to.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use dihedra_core::{DihedraError, Result};
use log::{debug, info};

/// A command-line program located by name (`PATH` lookup) or path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placed before the per-call arguments on every run.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run to completion and return standard output.
    ///
    /// # Errors
    ///
    /// [`DihedraError::ExternalTool`] if the program cannot be started or
    /// exits unsuccessfully; stderr is included in the message.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.extra_args).args(args);
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            DihedraError::ExternalTool(format!(
                "failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;
        if !output.status.success() {
            return Err(DihedraError::ExternalTool(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run `TMalign <mobile> <reference>` and return its report.
pub fn run_tmalign(tool: &ExternalTool, mobile: &Path, reference: &Path) -> Result<String> {
    info!(
        "aligning {} onto {}",
        mobile.display(),
        reference.display()
    );
    tool.run([mobile.as_os_str(), reference.as_os_str()])
}

/// Run `mkdssp <pdb> <output>`; the classic-format result lands in `output`.
pub fn run_dssp(tool: &ExternalTool, pdb: &Path, output: &Path) -> Result<()> {
    info!("assigning secondary structure for {}", pdb.display());
    tool.run([pdb.as_os_str(), output.as_os_str()])?;
    if !output.exists() {
        return Err(DihedraError::ExternalTool(format!(
            "{} did not write {}",
            tool.program().display(),
            output.display()
        )));
    }
    Ok(())
}
