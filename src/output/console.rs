use super::{Level, Reporter};

/// Plain-text signals on stdout.
pub struct ConsoleReporter;

/// Render one signal as a console line.
pub fn render(level: Level, message: &str) -> String {
    match level {
        Level::Info => message.to_string(),
        Level::Notice => format!("note: {}", message),
        Level::Warning => format!("warning: {}", message),
        Level::Failure => format!("error: {}", message),
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&self, level: Level, message: &str) {
        println!("{}", render(level, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_non_info_levels() {
        assert_eq!(render(Level::Info, "No issues found!"), "No issues found!");
        assert_eq!(render(Level::Warning, "low"), "warning: low");
        assert_eq!(render(Level::Failure, "high"), "error: high");
    }
}
