/// Connection Management Module
///
/// Owns the single connection to the backing store. The manager is created
/// once and handed to every caller explicitly; there is no global state.

use crate::core::db::{CanonicalRow, QueryExecutor};
use crate::core::{Result, SqlzooError};
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the backing store lives.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionTarget {
    /// A private in-memory database; empty every time it is opened
    Memory,
    /// An existing SQLite database file
    File(PathBuf),
}

impl ConnectionTarget {
    /// Parses a target string; `:memory:` selects an in-memory database.
    pub fn parse(target: &str) -> Self {
        if target == ":memory:" {
            ConnectionTarget::Memory
        } else {
            ConnectionTarget::File(PathBuf::from(target))
        }
    }

    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        ConnectionTarget::File(path.as_ref().to_path_buf())
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, ConnectionTarget::Memory)
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        match self {
            ConnectionTarget::Memory => Connection::open_in_memory(),
            // No SQLITE_OPEN_CREATE: the catalog must already exist.
            ConnectionTarget::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::Memory => write!(f, ":memory:"),
            ConnectionTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Connection manager for the query harness
///
/// Two states: no connection, or one open connection. `acquire` moves to the
/// second lazily, `release` back to the first. Dropping the manager releases
/// the connection.
#[derive(Debug)]
pub struct ConnectionManager {
    target: ConnectionTarget,
    connection: Option<Connection>,
}

impl ConnectionManager {
    /// Creates a manager for `target` without opening anything.
    pub fn new(target: ConnectionTarget) -> Self {
        ConnectionManager {
            target,
            connection: None,
        }
    }

    /// Runs `f` with a fresh manager and releases the connection afterwards,
    /// whether `f` succeeds or fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlzoo::core::db::{ConnectionManager, ConnectionTarget};
    ///
    /// let rows = ConnectionManager::scoped(ConnectionTarget::Memory, |manager| {
    ///     manager.execute("SELECT 1 AS one")
    /// })?;
    /// assert_eq!(rows.len(), 1);
    /// # Ok::<(), sqlzoo::core::SqlzooError>(())
    /// ```
    pub fn scoped<T, F>(target: ConnectionTarget, f: F) -> Result<T>
    where
        F: FnOnce(&mut ConnectionManager) -> Result<T>,
    {
        let mut manager = ConnectionManager::new(target);
        let outcome = f(&mut manager);
        let released = manager.release();
        let value = outcome?;
        released?;
        Ok(value)
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns the live connection, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns `SqlzooError::Connection` if the target cannot be opened or is
    /// not a SQLite database.
    pub fn acquire(&mut self) -> Result<&Connection> {
        let conn = match self.connection.take() {
            Some(conn) => conn,
            None => {
                let conn = self.open_validated()?;
                info!("Opened connection to {}", self.target);
                conn
            }
        };
        Ok(&*self.connection.insert(conn))
    }

    /// Closes the connection if one is open. Safe to call repeatedly.
    pub fn release(&mut self) -> Result<()> {
        if let Some(conn) = self.connection.take() {
            conn.close().map_err(|(_, e)| SqlzooError::Database(e))?;
            info!("Closed connection to {}", self.target);
        }
        Ok(())
    }

    /// Executes one statement against the managed connection.
    pub fn execute(&mut self, sql: &str) -> Result<Vec<CanonicalRow>> {
        let conn = self.acquire()?;
        QueryExecutor::new(conn).execute(sql)
    }

    fn open_validated(&self) -> Result<Connection> {
        debug!("Opening connection to {}", self.target);
        let conn = self
            .target
            .open()
            .map_err(|e| self.connection_error(e.to_string()))?;

        // Opening is lazy in SQLite; reading the header surfaces non-database files.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| self.connection_error(e.to_string()))?;

        Ok(conn)
    }

    fn connection_error(&self, message: impl Into<String>) -> SqlzooError {
        SqlzooError::Connection {
            target: self.target.to_string(),
            message: message.into(),
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close connection to {}: {}", self.target, e);
        }
    }
}
