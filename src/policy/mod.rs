//! Two-axis severity policy.
//!
//! A gate is configured with two independent axes, `fail-on` and `warn-on`.
//! Each axis selects which severity buckets make it fire. Validation happens
//! here, before any scan is started.

pub mod outcome;

use serde::Serialize;

use crate::error::{GateError, Result};

pub use outcome::{evaluate, Outcome, SeverityCount, Verdict};

/// Separator that would turn an axis into a list of values.
const LIST_SEPARATOR: char = ',';

/// Selector for one policy axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PolicyAxis {
    #[default]
    #[serde(rename = "unset")]
    Unset,
    #[serde(rename = "high")]
    HighOnly,
    #[serde(rename = "low")]
    LowOnly,
    #[serde(rename = "any")]
    Any,
}

impl PolicyAxis {
    /// Parse a raw input value. The empty string is the unset sentinel.
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Some(Self::Unset),
            "high" => Some(Self::HighOnly),
            "low" => Some(Self::LowOnly),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Whether this axis fires for the given counts.
    pub fn fires(self, counts: &SeverityCount) -> bool {
        match self {
            Self::Unset => false,
            Self::HighOnly => counts.high > 0,
            Self::LowOnly => counts.low > 0,
            Self::Any => counts.high > 0 || counts.low > 0,
        }
    }

    pub fn is_unset(self) -> bool {
        self == Self::Unset
    }
}

impl std::fmt::Display for PolicyAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::HighOnly => write!(f, "high"),
            Self::LowOnly => write!(f, "low"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// The validated pair of axes for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub fail_on: PolicyAxis,
    pub warn_on: PolicyAxis,
}

/// Result of validation: the policy plus advisories that should be shown
/// to the user but do not block the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPolicy {
    pub policy: Policy,
    pub advisories: Vec<String>,
}

/// Validate raw `fail-on`, `warn-on` and `working-directory` inputs.
///
/// Rejects list values, unknown symbols and a policy where both axes are
/// unset. A non-default working directory only produces an advisory.
pub fn validate(fail_on: &str, warn_on: &str, working_directory: &str) -> Result<ValidatedPolicy> {
    let policy = Policy {
        fail_on: parse_axis("fail-on", fail_on)?,
        warn_on: parse_axis("warn-on", warn_on)?,
    };

    if policy.fail_on.is_unset() && policy.warn_on.is_unset() {
        return Err(GateError::Configuration(
            "at least one of fail-on or warn-on must be set to \"high\", \"low\" or \"any\"".into(),
        ));
    }

    let mut advisories = Vec::new();
    let dir = working_directory.trim();
    if !dir.is_empty() && dir != "." {
        let advisory = format!(
            "working-directory is set to \"{}\". Prefer setting `root = \"{}\"` in aderyn.toml \
             so local runs and CI scan the same path.",
            dir, dir
        );
        tracing::debug!(working_directory = dir, "non-default working directory");
        advisories.push(advisory);
    }

    Ok(ValidatedPolicy { policy, advisories })
}

fn parse_axis(name: &str, value: &str) -> Result<PolicyAxis> {
    if value.contains(LIST_SEPARATOR) {
        return Err(GateError::Configuration(format!(
            "{} takes a single value but got \"{}\"; use \"any\" to cover high and low together",
            name, value
        )));
    }

    PolicyAxis::from_str_lenient(value).ok_or_else(|| {
        let hint = if value.trim().eq_ignore_ascii_case("both") {
            " (\"both\" has been replaced by \"any\")"
        } else {
            ""
        };
        GateError::Configuration(format!(
            "{} must be one of \"high\", \"low\", \"any\" or empty, got \"{}\"{}",
            name, value, hint
        ))
    })
}
