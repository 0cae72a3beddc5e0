//! GitHub Actions workflow commands.
//!
//! Warnings and failures become `::warning::` and `::error::` annotations;
//! info lines are printed as-is. The job itself is failed through the
//! process exit code.

use uuid::Uuid;

use super::{Level, Reporter};

pub struct GithubReporter;

/// Render one signal as a workflow command line.
pub fn render(level: Level, message: &str) -> String {
    let command = match level {
        Level::Info => return guard_commands(message, &Uuid::new_v4().simple().to_string()),
        Level::Notice => "notice",
        Level::Warning => "warning",
        Level::Failure => "error",
    };
    format!("::{}::{}", command, escape_data(message))
}

/// Escape a message so a multi-line value stays one command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Wrap text that contains workflow-command lines in a `stop-commands`
/// block so the runner prints them instead of executing them.
fn guard_commands(message: &str, token: &str) -> String {
    if !message.lines().any(|l| l.trim_start().starts_with("::")) {
        return message.to_string();
    }
    format!("::stop-commands::{}\n{}\n::{}::", token, message, token)
}

impl Reporter for GithubReporter {
    fn emit(&self, level: Level, message: &str) {
        println!("{}", render(level, message));
    }
}
