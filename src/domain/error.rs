//! Domain error types.
//!
//! Only configuration and I/O faults surface to callers. Soft signal
//! conditions (instrument not ready, missing state, degenerate ratio
//! denominators) are resolved locally by the component that sees them.

/// Top-level error type for rotator.
#[derive(Debug, thiserror::Error)]
pub enum RotatorError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error("insufficient history for {code} on {exchange}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        code: String,
        exchange: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bad data in {file}: {reason}")]
    BadData { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RotatorError> for std::process::ExitCode {
    fn from(err: &RotatorError) -> Self {
        let code: u8 = match err {
            RotatorError::Io(_) => 1,
            RotatorError::ConfigParse { .. }
            | RotatorError::ConfigMissing { .. }
            | RotatorError::ConfigInvalid { .. } => 2,
            RotatorError::NoData { .. }
            | RotatorError::InsufficientHistory { .. }
            | RotatorError::BadData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
