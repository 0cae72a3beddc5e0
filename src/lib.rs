//! aderyn-gate: a CI gate around the Aderyn static analyzer.
//!
//! Runs Aderyn over a repository, counts high and low severity issues and
//! decides from a two-axis policy (`fail-on`, `warn-on`) whether the CI job
//! passes, passes with a warning, or fails.
//!
//! # Quick Start
//!
//! ```no_run
//! use aderyngate::output::{reporter_for, OutputFormat};
//! use aderyngate::{run_gate, GateOptions};
//!
//! let options = GateOptions {
//!     fail_on: Some("high".into()),
//!     warn_on: Some("low".into()),
//!     ..GateOptions::default()
//! };
//! let reporter = reporter_for(OutputFormat::Console);
//! let report = run_gate(&options, reporter.as_ref()).unwrap();
//! std::process::exit(report.verdict.exit_code());
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod policy;
pub mod scan;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use config::{Config, CONFIG_FILE};
use error::Result;
use output::Reporter;
use policy::{Outcome, Policy, SeverityCount, ValidatedPolicy, Verdict};
use scan::{AderynCommand, Analyzer, ReportCollector};

/// Options for a gate invocation. `Some` values override the config file.
#[derive(Debug, Clone, Default)]
pub struct GateOptions {
    /// Path to config file (defaults to `.aderyn-gate.toml` in the current directory).
    pub config_path: Option<PathBuf>,
    pub fail_on: Option<String>,
    pub warn_on: Option<String>,
    pub working_directory: Option<String>,
    /// Where transient report files are written (defaults to the current directory).
    pub artifact_dir: Option<PathBuf>,
}

/// Raw inputs after merging CLI values over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub fail_on: String,
    pub warn_on: String,
    pub working_directory: String,
}

impl ResolvedInputs {
    pub fn validate(&self) -> Result<ValidatedPolicy> {
        policy::validate(&self.fail_on, &self.warn_on, &self.working_directory)
    }

    /// Directory handed to the analyzer.
    pub fn target(&self) -> PathBuf {
        match self.working_directory.trim() {
            "" => PathBuf::from("."),
            dir => PathBuf::from(dir),
        }
    }
}

impl GateOptions {
    pub fn load_config(&self) -> Result<Config> {
        let path = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Config::load(&path)
    }

    pub fn resolve(&self, config: &Config) -> ResolvedInputs {
        let pick = |cli: &Option<String>, file: &String| cli.clone().unwrap_or_else(|| file.clone());
        ResolvedInputs {
            fail_on: pick(&self.fail_on, &config.policy.fail_on),
            warn_on: pick(&self.warn_on, &config.policy.warn_on),
            working_directory: pick(&self.working_directory, &config.policy.working_directory),
        }
    }
}

/// Result of one gate invocation.
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub target: String,
    pub counts: SeverityCount,
    pub policy: Policy,
    pub outcomes: Vec<Outcome>,
    pub verdict: Verdict,
    pub generated_at: DateTime<Utc>,
}

/// Load config, validate the policy and run the gate with the analyzer
/// configured in the config file.
pub fn run_gate(options: &GateOptions, reporter: &dyn Reporter) -> Result<GateReport> {
    let config = options.load_config()?;
    let analyzer = AderynCommand::from_config(&config.analyzer);
    run_gate_with(options, &config, &analyzer, reporter)
}

/// Run the gate: validate, collect, evaluate, report.
///
/// Validation completes before the analyzer is started. Fatal errors are
/// returned as-is; [`run_and_signal_with`] turns them into a failure signal.
pub fn run_gate_with(
    options: &GateOptions,
    config: &Config,
    analyzer: &dyn Analyzer,
    reporter: &dyn Reporter,
) -> Result<GateReport> {
    let inputs = options.resolve(config);
    let validated = inputs.validate()?;
    for advisory in &validated.advisories {
        reporter.notice(advisory);
    }

    let target = inputs.target();
    let artifact_dir = options
        .artifact_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let collected = ReportCollector::new(analyzer)
        .with_artifact_dir(artifact_dir)
        .collect(&target)?;

    if !collected.human_readable.trim().is_empty() {
        reporter.info(&collected.human_readable);
    }

    let outcomes = policy::evaluate(&collected.counts, &validated.policy);
    output::report(reporter, &collected.counts, &outcomes);

    Ok(GateReport {
        target: target.display().to_string(),
        counts: collected.counts,
        policy: validated.policy,
        verdict: Verdict::from_outcomes(&outcomes),
        outcomes,
        generated_at: Utc::now(),
    })
}

/// Exit status of a signalled run, with the report when the gate completed.
#[derive(Debug, Clone)]
pub struct GateExit {
    pub report: Option<GateReport>,
    pub exit_code: i32,
}

/// Run the gate and turn any fatal error into a single failure signal.
///
/// Exit codes: 0 pass (warnings allowed), 1 fail policy fired, 2 fatal error.
pub fn run_and_signal(options: &GateOptions, reporter: &dyn Reporter) -> GateExit {
    signal_exit(run_gate(options, reporter), reporter)
}

/// Like [`run_and_signal`], with an explicit config and analyzer.
pub fn run_and_signal_with(
    options: &GateOptions,
    config: &Config,
    analyzer: &dyn Analyzer,
    reporter: &dyn Reporter,
) -> GateExit {
    signal_exit(run_gate_with(options, config, analyzer, reporter), reporter)
}

fn signal_exit(result: Result<GateReport>, reporter: &dyn Reporter) -> GateExit {
    match result {
        Ok(report) => GateExit {
            exit_code: report.verdict.exit_code(),
            report: Some(report),
        },
        Err(e) => {
            reporter.fail(&e.to_string());
            GateExit {
                report: None,
                exit_code: e.exit_code(),
            }
        }
    }
}
