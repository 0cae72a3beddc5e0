use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".aderyn-gate.toml";

/// Top-level configuration from `.aderyn-gate.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Raw policy values. Kept as strings so file and CLI inputs go through
/// the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_fail_on")]
    pub fail_on: String,
    #[serde(default)]
    pub warn_on: String,
    #[serde(default)]
    pub working_directory: String,
}

fn default_fail_on() -> String {
    "high".into()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
            warn_on: String::new(),
            working_directory: String::new(),
        }
    }
}

/// How to invoke the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Extra arguments passed before the target on every invocation.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_program() -> String {
    "aderyn".into()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# aderyn-gate configuration

[policy]
# Fail the build when issues of this severity are found ("", high, low, any).
fail_on = "high"

# Emit a warning (without failing) for these issues ("", high, low, any).
warn_on = "low"

# Directory to scan. Prefer `root` in aderyn.toml instead.
# working_directory = ""

[analyzer]
program = "aderyn"
# args = ["--no-snippets"]
"#
    }
}
