//! Boundary over the external analyzer.
//!
//! The analyzer is run twice per gate invocation, once for a JSON report
//! used for counting and once for a high-severity markdown report shown to
//! the operator. Both files are transient.

pub mod analyzer;
pub mod artifact;
pub mod collector;

pub use analyzer::{AderynCommand, Analyzer, ScanRequest};
pub use artifact::{ArtifactNamer, ReportFormat, TransientArtifact};
pub use collector::{parse_issue_count, CollectedReport, ReportCollector};
