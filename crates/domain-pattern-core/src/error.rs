use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainPatternError {
    #[error("Invalid invocation: {message}")]
    InvalidInvocation { message: String },

    #[error("Input file does not exist: {path}")]
    MissingInput { path: PathBuf },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DomainPatternError>;

impl DomainPatternError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInvocation { .. } => 2,
            Self::MissingInput { .. } => 3,
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } | Self::InvalidValue { .. } => {
                4
            }
            Self::Io(_) => 1,
        }
    }
}
