/// sqlzoo Error Module
///
/// Error types shared by the harness, the fixture loader and the output layer.
use thiserror::Error;

/// Error type for the sqlzoo crate.
///
/// The harness itself only produces two kinds of failure:
/// - `Connection` when the backing store cannot be opened
/// - `Query` when the store rejects a statement
///
/// The remaining variants belong to the surrounding tooling (fixtures,
/// configuration, rendering).
#[derive(Error, Debug)]
pub enum SqlzooError {
    /// The backing store could not be reached or opened
    #[error("Connection error: {target}: {message}")]
    Connection { target: String, message: String },

    /// The store rejected a statement; carries the driver diagnostic unmodified
    #[error("Query error: {0}")]
    Query(String),

    /// Direct SQLite failures outside statement execution (fixture loading, close)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A question name that is not in the tutorial table
    #[error("Unknown question: '{0}'")]
    UnknownQuestion(String),

    /// Bad command-line invocation
    #[error("Usage error: {0}")]
    Usage(String),

    /// Rendering and export errors
    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SqlzooError {
    /// Wraps a driver failure raised while preparing or stepping a statement.
    pub(crate) fn query(err: rusqlite::Error) -> Self {
        SqlzooError::Query(err.to_string())
    }

    /// Returns the driver diagnostic for `Query` errors.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            SqlzooError::Query(message) => Some(message),
            _ => None,
        }
    }
}

/// Type alias for Result to use SqlzooError as the error type.
pub type Result<T> = std::result::Result<T, SqlzooError>;
