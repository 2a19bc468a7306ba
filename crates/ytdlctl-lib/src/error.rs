use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtdlError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Executable {name} not found: {reason}")]
    ExecutableNotFound { name: String, reason: String },

    #[error("Failed to spawn {program}: {reason}")]
    Spawn { program: PathBuf, reason: String },

    #[error("A download is already running on this controller")]
    AlreadyRunning,

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
