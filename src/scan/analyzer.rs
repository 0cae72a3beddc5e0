use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::error::{GateError, Result};

/// Lines of analyzer stderr carried into a scan error.
const STDERR_TAIL_LINES: usize = 20;

/// One analyzer invocation: scan `target`, write the report to `output`.
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub target: &'a Path,
    pub output: &'a Path,
    /// Restrict the report to high-severity findings.
    pub highs_only: bool,
}

/// The external static analyzer.
///
/// Implementations run synchronously and return once the report file at
/// `request.output` is complete.
pub trait Analyzer: Send + Sync {
    /// Human-readable tool name for messages.
    fn name(&self) -> &str;

    /// Run one scan.
    fn run(&self, request: &ScanRequest<'_>) -> Result<()>;
}

/// Runs the `aderyn` binary as a subprocess.
///
/// The report format follows the extension of the output path.
#[derive(Debug, Clone)]
pub struct AderynCommand {
    program: String,
    args: Vec<String>,
}

impl AderynCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// Arguments passed after the program name.
    pub fn arguments(&self, request: &ScanRequest<'_>) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(request.target.display().to_string());
        args.push("-o".into());
        args.push(request.output.display().to_string());
        if request.highs_only {
            args.push("--highs-only".into());
        }
        args
    }
}

impl Default for AderynCommand {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl Analyzer for AderynCommand {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, request: &ScanRequest<'_>) -> Result<()> {
        let args = self.arguments(request);
        debug!("Running {}: {:?}", self.program, args);

        // Analyzer progress goes to the job log on stderr; stdout carries
        // platform signals only.
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GateError::Scan(format!(
                        "{} not found. Please install it first.",
                        self.program
                    ))
                } else {
                    GateError::Scan(format!("failed to run {}: {}", self.program, e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".into());
            return Err(GateError::Scan(format!(
                "{} exited with status {}: {}",
                self.program,
                code,
                stderr_tail(&stderr)
            )));
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join("\n");
    if tail.is_empty() {
        "(no stderr output)".into()
    } else {
        tail
    }
}
