pub mod console;
pub mod github;
pub mod json;

use crate::policy::{Outcome, SeverityCount};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Github,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "github" | "gha" | "github-actions" => Some(Self::Github),
            _ => None,
        }
    }

    /// GitHub workflow commands when running under Actions, plain text otherwise.
    pub fn detect() -> Self {
        match std::env::var("GITHUB_ACTIONS") {
            Ok(v) if v == "true" => Self::Github,
            _ => Self::Console,
        }
    }
}

/// Severity of a single platform signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Notice,
    Warning,
    Failure,
}

/// Sink for CI platform signals.
///
/// Passed explicitly through the gate so tests can record what a run
/// emitted. Emitting is best effort and never fails.
pub trait Reporter {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn notice(&self, message: &str) {
        self.emit(Level::Notice, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    /// Marks the job as failed.
    fn fail(&self, message: &str) {
        self.emit(Level::Failure, message);
    }
}

pub fn reporter_for(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Console => Box::new(console::ConsoleReporter),
        OutputFormat::Github => Box::new(github::GithubReporter),
    }
}

/// Emit the severity summary, then one signal per outcome.
pub fn report(reporter: &dyn Reporter, counts: &SeverityCount, outcomes: &[Outcome]) {
    reporter.info(&counts.summary());
    for outcome in outcomes {
        match outcome {
            Outcome::Fail(msg) => reporter.fail(msg),
            Outcome::Warn(msg) => reporter.warning(msg),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_precedes_signals() {
        let reporter = RecordingReporter::default();
        let counts = SeverityCount::new(1, 0);
        report(
            &reporter,
            &counts,
            &[Outcome::Fail("f".into()), Outcome::Warn("w".into())],
        );
        assert_eq!(
            reporter.signals(),
            vec![
                (Level::Info, counts.summary()),
                (Level::Failure, "f".to_string()),
                (Level::Warning, "w".to_string()),
            ]
        );
    }

    #[test]
    fn clean_run_only_summarizes() {
        let reporter = RecordingReporter::default();
        report(&reporter, &SeverityCount::default(), &[]);
        assert_eq!(
            reporter.signals(),
            vec![(Level::Info, "No issues found!".to_string())]
        );
    }

    #[test]
    fn parses_formats_leniently() {
        assert_eq!(OutputFormat::from_str_lenient("GitHub"), Some(OutputFormat::Github));
        assert_eq!(OutputFormat::from_str_lenient("text"), Some(OutputFormat::Console));
        assert_eq!(OutputFormat::from_str_lenient("sarif"), None);
    }
}
