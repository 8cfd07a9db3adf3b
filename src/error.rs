use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Errors raised by the statement builder and its connection collaborators.
///
/// Nothing is retried or translated internally; every failure surfaces
/// synchronously to the caller of the terminal operation. A failure inside a
/// transaction scope rolls the scope back and then propagates unchanged.
#[derive(Debug, Error)]
pub enum DataSetError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
