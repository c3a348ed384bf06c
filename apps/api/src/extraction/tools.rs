//! External converter invocation with a deadline.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::extraction::ExtractionError;

/// Locations and limits for the external converters.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub pdftotext_bin: PathBuf,
    pub soffice_bin: PathBuf,
    /// Parent directory for converter output directories.
    pub scratch_dir: PathBuf,
    pub timeout: Duration,
}

impl ToolConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pdftotext_bin: config.pdftotext_bin.clone(),
            soffice_bin: config.soffice_bin.clone(),
            scratch_dir: config.staging_dir.clone(),
            timeout: config.tool_timeout,
        }
    }

    /// Runs `program` to completion and returns its output.
    /// A launch error, nonzero exit, or missed deadline is an extraction failure.
    /// The child is killed if the deadline passes.
    pub async fn run(&self, program: &Path, args: &[&OsStr]) -> Result<Output, ExtractionError> {
        let name = program.display().to_string();
        debug!("Running {name} with {} args", args.len());

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ExtractionError::Failed(format!("failed to run {name}: {e}"))),
            Err(_) => {
                return Err(ExtractionError::Failed(format!(
                    "{name} timed out after {}s",
                    self.timeout.as_secs_f32()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Failed(format!(
                "{name} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output)
    }
}
