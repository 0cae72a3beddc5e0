//! Per-invocation report file names and the guards that remove them.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{GateError, Result};

const REPORT_PREFIX: &str = "aderyn-report";

/// Which of the two analyzer reports a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Machine-readable JSON report used for counting.
    Structured,
    /// Markdown report shown to the operator.
    HumanReadable,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Structured => "json",
            Self::HumanReadable => "md",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::HumanReadable => write!(f, "human-readable"),
        }
    }
}

/// Names the report files of a single collection run.
///
/// One random suffix is drawn per namer, so concurrent or retried runs in
/// the same directory never share a file name.
#[derive(Debug, Clone)]
pub struct ArtifactNamer {
    dir: PathBuf,
    suffix: String,
}

impl ArtifactNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffix: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn path_for(&self, format: ReportFormat) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            REPORT_PREFIX,
            self.suffix,
            format.extension()
        ))
    }

    /// Claim the file for `format`. It is deleted when the guard drops.
    pub fn artifact(&self, format: ReportFormat) -> TransientArtifact {
        TransientArtifact {
            path: self.path_for(format),
            format,
        }
    }
}

/// A report file owned by exactly one collection run.
///
/// Dropping the guard removes the file whether or not it was ever written.
/// Removal is best effort: failures are logged, never raised.
#[derive(Debug)]
pub struct TransientArtifact {
    path: PathBuf,
    format: ReportFormat,
}

impl TransientArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the report the analyzer wrote. A missing or unreadable file
    /// means the scan did not produce its output.
    pub fn read_to_string(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            GateError::Scan(format!(
                "could not read {} report {}: {}",
                self.format,
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for TransientArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove report, leaving it behind"
            ),
        }
    }
}
