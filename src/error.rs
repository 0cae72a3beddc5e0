use thiserror::Error;

pub type Result<T> = std::result::Result<T, GateError>;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Report parse error: {0}")]
    ReportParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GateError {
    /// Process exit code for a fatal error. Policy failures exit with 1
    /// and never reach this path.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
