use std::path::PathBuf;

use crate::game::BoardError;

/// Errors returned by a decision oracle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle is not initialized yet")]
    Unavailable,

    #[error("oracle rejected the board: {0}")]
    Rejected(String),

    #[error("oracle found no move to play")]
    NoMove,

    #[error("oracle task failed: {0}")]
    TaskFailed(String),
}

/// Errors that stop a game session from advancing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Recoverable: nothing was applied, the same call may be retried.
    #[error("oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    /// The oracle recommended a move the board cannot take. The session is
    /// halted until a new game starts.
    #[error("oracle recommended an illegal move in column {column}: {source}")]
    OracleContractViolation { column: usize, source: BoardError },

    #[error("session halted after an oracle contract violation; start a new game")]
    Halted,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
