//! Domain error types.

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum MacrossError {
    #[error("invalid span {span}: spans must be at least 1")]
    InvalidSpan { span: usize },

    #[error("invalid initial capital {capital}: must be a positive number")]
    InvalidCapital { capital: f64 },

    #[error("series length mismatch: fast has {fast} values, slow has {slow}")]
    LengthMismatch { fast: usize, slow: usize },

    #[error("signal count {signals} does not match bar count {bars}")]
    SignalMismatch { bars: usize, signals: usize },

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {identifier}")]
    NoData { identifier: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MacrossError> for std::process::ExitCode {
    fn from(err: &MacrossError) -> Self {
        let code: u8 = match err {
            MacrossError::Io(_) => 1,
            MacrossError::ConfigParse { .. }
            | MacrossError::ConfigMissing { .. }
            | MacrossError::ConfigInvalid { .. } => 2,
            MacrossError::Data { .. } => 3,
            MacrossError::InvalidSpan { .. }
            | MacrossError::InvalidCapital { .. }
            | MacrossError::LengthMismatch { .. }
            | MacrossError::SignalMismatch { .. } => 4,
            MacrossError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
