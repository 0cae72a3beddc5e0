use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::analyzer::{Analyzer, ScanRequest};
use super::artifact::{ArtifactNamer, ReportFormat};
use crate::error::{GateError, Result};
use crate::policy::SeverityCount;

/// What one collection run hands back to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedReport {
    pub counts: SeverityCount,
    /// High-severity-only markdown report, shown to the operator.
    pub human_readable: String,
}

/// Drives the analyzer twice and turns its reports into counts.
///
/// Report files live in `artifact_dir` under a fresh random name for the
/// duration of one `collect` call and are removed on every exit path.
pub struct ReportCollector<'a> {
    analyzer: &'a dyn Analyzer,
    artifact_dir: PathBuf,
}

impl<'a> ReportCollector<'a> {
    pub fn new(analyzer: &'a dyn Analyzer) -> Self {
        Self {
            analyzer,
            artifact_dir: PathBuf::from("."),
        }
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Scan `target` and return its severity counts and markdown report.
    pub fn collect(&self, target: &Path) -> Result<CollectedReport> {
        let namer = ArtifactNamer::new(&self.artifact_dir);
        let structured = namer.artifact(ReportFormat::Structured);
        let human = namer.artifact(ReportFormat::HumanReadable);
        debug!(
            analyzer = self.analyzer.name(),
            suffix = namer.suffix(),
            target = %target.display(),
            "collecting reports"
        );

        self.analyzer.run(&ScanRequest {
            target,
            output: structured.path(),
            highs_only: false,
        })?;
        let counts = parse_issue_count(&structured.read_to_string()?)?;

        self.analyzer.run(&ScanRequest {
            target,
            output: human.path(),
            highs_only: true,
        })?;
        let human_readable = human.read_to_string()?;

        Ok(CollectedReport {
            counts,
            human_readable,
        })
    }
}

/// Extract `issue_count.high` and `issue_count.low` from a JSON report.
pub fn parse_issue_count(data: &str) -> Result<SeverityCount> {
    let report: Value = serde_json::from_str(data)
        .map_err(|e| GateError::Scan(format!("structured report is not valid JSON: {}", e)))?;

    let issue_count = report
        .get("issue_count")
        .ok_or_else(|| GateError::ReportParse("report has no `issue_count` object".into()))?;

    let bucket = |name: &str| {
        issue_count
            .get(name)
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                GateError::ReportParse(format!(
                    "`issue_count.{}` is missing or not a non-negative integer",
                    name
                ))
            })
    };

    Ok(SeverityCount {
        high: bucket("high")?,
        low: bucket("low")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Writes canned reports and remembers every output path it was given.
    struct FakeAnalyzer {
        structured: String,
        markdown: String,
        fail_on_call: Option<usize>,
        outputs: Mutex<Vec<(PathBuf, bool)>>,
    }

    impl FakeAnalyzer {
        fn new(structured: &str) -> Self {
            Self {
                structured: structured.into(),
                markdown: "# Aderyn Analysis Report\n".into(),
                fail_on_call: None,
                outputs: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        fn outputs(&self) -> Vec<(PathBuf, bool)> {
            self.outputs.lock().unwrap().clone()
        }
    }

    impl Analyzer for FakeAnalyzer {
        fn name(&self) -> &str {
            "fake"
        }

        fn run(&self, request: &ScanRequest<'_>) -> Result<()> {
            let mut outputs = self.outputs.lock().unwrap();
            outputs.push((request.output.to_path_buf(), request.highs_only));
            let body = if request.highs_only {
                &self.markdown
            } else {
                &self.structured
            };
            // Crashing scans still leave a partial file behind.
            std::fs::write(request.output, body)?;
            if self.fail_on_call == Some(outputs.len()) {
                return Err(GateError::Scan("fake exited with status 1".into()));
            }
            Ok(())
        }
    }

    fn assert_cleaned(analyzer: &FakeAnalyzer, dir: &Path) {
        for (path, _) in analyzer.outputs() {
            assert!(!path.exists(), "{} was left behind", path.display());
        }
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
    }

    #[test]
    fn collects_counts_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new(r#"{"issue_count":{"high":2,"low":5},"files_summary":{}}"#);
        let report = ReportCollector::new(&analyzer)
            .with_artifact_dir(dir.path())
            .collect(Path::new("."))
            .unwrap();

        assert_eq!(report.counts, SeverityCount::new(2, 5));
        assert_eq!(report.human_readable, "# Aderyn Analysis Report\n");
        assert_cleaned(&analyzer, dir.path());
    }

    #[test]
    fn runs_structured_scan_first_then_highs_only() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new(r#"{"issue_count":{"high":0,"low":0}}"#);
        ReportCollector::new(&analyzer)
            .with_artifact_dir(dir.path())
            .collect(Path::new("."))
            .unwrap();

        let outputs = analyzer.outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0.extension().unwrap(), "json");
        assert!(!outputs[0].1);
        assert_eq!(outputs[1].0.extension().unwrap(), "md");
        assert!(outputs[1].1);
        assert_eq!(outputs[0].0.file_stem(), outputs[1].0.file_stem());
    }

    #[test]
    fn missing_fields_are_parse_errors_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new(r#"{"issue_count":{"high":1}}"#);
        let result = ReportCollector::new(&analyzer)
            .with_artifact_dir(dir.path())
            .collect(Path::new("."));

        match result {
            Err(GateError::ReportParse(msg)) => assert!(msg.contains("issue_count.low")),
            other => panic!("expected report parse error, got {:?}", other),
        }
        assert_cleaned(&analyzer, dir.path());
    }

    #[test]
    fn invalid_json_is_scan_error_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new("Error: compilation failed");
        let result = ReportCollector::new(&analyzer)
            .with_artifact_dir(dir.path())
            .collect(Path::new("."));

        assert!(matches!(result, Err(GateError::Scan(_))));
        assert_cleaned(&analyzer, dir.path());
    }

    #[test]
    fn analyzer_failure_cleans_partial_reports() {
        for call in 1..=2 {
            let dir = tempfile::tempdir().unwrap();
            let analyzer =
                FakeAnalyzer::new(r#"{"issue_count":{"high":0,"low":0}}"#).failing_on(call);
            let result = ReportCollector::new(&analyzer)
                .with_artifact_dir(dir.path())
                .collect(Path::new("."));

            assert!(matches!(result, Err(GateError::Scan(_))));
            assert_eq!(analyzer.outputs().len(), call);
            assert_cleaned(&analyzer, dir.path());
        }
    }

    #[test]
    fn repeated_collects_use_fresh_names() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new(r#"{"issue_count":{"high":0,"low":1}}"#);
        let collector = ReportCollector::new(&analyzer).with_artifact_dir(dir.path());
        collector.collect(Path::new(".")).unwrap();
        collector.collect(Path::new(".")).unwrap();

        let outputs = analyzer.outputs();
        assert_ne!(outputs[0].0, outputs[2].0);
        assert_ne!(outputs[1].0, outputs[3].0);
    }

    #[test]
    fn concurrent_collects_in_one_directory_do_not_clash() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FakeAnalyzer::new(r#"{"issue_count":{"high":3,"low":0}}"#);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let report = ReportCollector::new(&analyzer)
                        .with_artifact_dir(dir.path())
                        .collect(Path::new("."))
                        .unwrap();
                    assert_eq!(report.counts, SeverityCount::new(3, 0));
                });
            }
        });

        let mut paths: Vec<PathBuf> = analyzer.outputs().into_iter().map(|(p, _)| p).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
        assert_cleaned(&analyzer, dir.path());
    }

    #[test]
    fn parse_rejects_non_integer_counts() {
        let err = parse_issue_count(r#"{"issue_count":{"high":"2","low":0}}"#).unwrap_err();
        assert!(matches!(err, GateError::ReportParse(_)));

        let err = parse_issue_count(r#"{"issue_count":{"high":-1,"low":0}}"#).unwrap_err();
        assert!(matches!(err, GateError::ReportParse(_)));

        let err = parse_issue_count(r#"{"files_summary":{}}"#).unwrap_err();
        assert!(matches!(err, GateError::ReportParse(_)));
    }
}
