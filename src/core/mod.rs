/// Core Module for sqlzoo
///
/// Shared infrastructure: the connection manager, the statement executor with
/// its canonical row model, and the crate error type.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, SqlzooError};
