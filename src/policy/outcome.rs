use serde::Serialize;

use super::Policy;

const REMEDIATION: &str = "Review the Aderyn report for details, then fix the reported issues \
                           or relax the fail-on / warn-on policy.";

/// Issue counts per severity bucket, as reported by the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub high: u64,
    pub low: u64,
}

impl SeverityCount {
    pub fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    pub fn is_clean(&self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// One-line summary printed on every run.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            "No issues found!".into()
        } else {
            format!(
                "Aderyn found {} high and {} low severity issue(s).",
                self.high, self.low
            )
        }
    }

    /// Explanation attached to a warn or fail signal.
    pub fn explain(&self) -> String {
        format!(
            "{} and {}. {}",
            bucket_clause(self.high, "high", true),
            bucket_clause(self.low, "low", false),
            REMEDIATION
        )
    }
}

fn bucket_clause(count: u64, bucket: &str, leading: bool) -> String {
    match count {
        0 if leading => format!("No {} issues were found", bucket),
        0 => format!("no {} issues were found", bucket),
        1 => format!("1 {} issue was found", bucket),
        n => format!("{} {} issues were found", n, bucket),
    }
}

/// A signal produced by one firing policy axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Outcome {
    Warn(String),
    Fail(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Warn(msg) | Self::Fail(msg) => msg,
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

/// Terminal status of a run. Warnings never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        if outcomes.iter().any(Outcome::is_fail) {
            Self::Fail
        } else {
            Self::Pass
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
        }
    }
}

/// Evaluate both axes of `policy` against `counts`.
///
/// Returns at most one `Fail` followed by at most one `Warn`. An empty
/// result means the run passes cleanly.
pub fn evaluate(counts: &SeverityCount, policy: &Policy) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(2);
    if policy.fail_on.fires(counts) {
        outcomes.push(Outcome::Fail(counts.explain()));
    }
    if policy.warn_on.fires(counts) {
        outcomes.push(Outcome::Warn(counts.explain()));
    }
    outcomes
}
