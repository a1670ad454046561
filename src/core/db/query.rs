/// Query Execution Module
///
/// Runs one statement and normalizes the full result set into canonical rows.

use crate::core::db::{CanonicalRow, Scalar};
use crate::core::{Result, SqlzooError};
use chrono::NaiveDate;
use rusqlite::{types::ValueRef, Batch, Connection, Statement};
use tracing::debug;

/// How a result column was declared in the schema, as far as normalization cares.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DeclaredType {
    Date,
    Other,
}

impl DeclaredType {
    /// Computed columns have no declared type.
    fn from_decl(decl: Option<&str>) -> Self {
        match decl {
            Some(decl) => {
                let decl = decl.to_uppercase();
                if decl.contains("DATE") && !decl.contains("TIME") {
                    DeclaredType::Date
                } else {
                    DeclaredType::Other
                }
            }
            None => DeclaredType::Other,
        }
    }
}

struct ResultColumn {
    name: String,
    declared: DeclaredType,
}

/// Statement executor over a borrowed connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Executes a SQL statement and returns every result row.
    ///
    /// The text is passed to SQLite unmodified. Rows are fetched eagerly and
    /// keep the store's order. Statements that produce no rows (including
    /// writes, which commit immediately) return an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `SqlzooError::Query` with the driver diagnostic if the statement
    /// fails to prepare or fails while stepping, if the text holds no statement,
    /// or if anything follows the first statement.
    pub fn execute(&self, sql: &str) -> Result<Vec<CanonicalRow>> {
        debug!("Executing statement: {}", sql.trim());
        let mut stmt = self.prepare_single(sql)?;

        let columns: Vec<ResultColumn> = stmt
            .columns()
            .iter()
            .map(|column| ResultColumn {
                name: column.name().to_string(),
                declared: DeclaredType::from_decl(column.decl_type()),
            })
            .collect();

        let mut rows = stmt.query([]).map_err(SqlzooError::query)?;
        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(SqlzooError::query)? {
            let mut entries = Vec::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                let value = row.get_ref(i).map_err(SqlzooError::query)?;
                entries.push((column.name.clone(), normalize_value(value, column.declared)));
            }
            result.push(CanonicalRow::new(entries));
        }

        debug!("Statement returned {} rows", result.len());
        Ok(result)
    }

    /// Prepares exactly one statement; comment-only and whitespace text is skipped.
    fn prepare_single(&self, sql: &str) -> Result<Statement<'a>> {
        let mut batch = Batch::new(self.connection, sql);
        let stmt = match batch.next().map_err(SqlzooError::query)? {
            Some(stmt) => stmt,
            None => return Err(SqlzooError::Query(EMPTY_STATEMENT.to_string())),
        };
        // Any further text that is not whitespace or a comment is a second statement,
        // even when it fails to prepare on its own.
        match batch.next() {
            Ok(None) => Ok(stmt),
            Ok(Some(_)) | Err(_) => Err(SqlzooError::query(rusqlite::Error::MultipleStatement)),
        }
    }
}

/// Diagnostic for text that contains no statement at all.
pub const EMPTY_STATEMENT: &str = "empty statement";

/// Convenience function to execute a statement on a connection
pub fn execute_on_connection(conn: &Connection, sql: &str) -> Result<Vec<CanonicalRow>> {
    QueryExecutor::new(conn).execute(sql)
}

/// Maps a SQLite value onto the closest canonical scalar.
fn normalize_value(value: ValueRef, declared: DeclaredType) -> Scalar {
    match value {
        ValueRef::Null => Scalar::Null,
        ValueRef::Integer(i) => Scalar::Integer(i),
        ValueRef::Real(f) => Scalar::Float(f),
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t);
            if declared == DeclaredType::Date {
                if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                    return Scalar::Date(date);
                }
            }
            Scalar::Text(text.into_owned())
        }
        ValueRef::Blob(b) => Scalar::Text(String::from_utf8_lossy(b).into_owned()),
    }
}
