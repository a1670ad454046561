// Core infrastructure modules
pub mod core;

// Tutorial content and tooling around the harness
pub mod compare;
pub mod config;
pub mod fixtures;
pub mod questions;
pub mod results_grid;

pub use crate::core::db::{execute_on_connection, CanonicalRow, ConnectionManager, ConnectionTarget, Scalar};
pub use crate::core::{Result, SqlzooError};
