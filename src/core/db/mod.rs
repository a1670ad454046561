/// Database Module
///
/// The query harness, split by concern:
/// - **Connection Management** (`connection.rs`): one lazily opened connection per manager
/// - **Query Execution** (`query.rs`): runs a statement and normalizes the result set
/// - **Canonical Rows** (`row.rs`): the typed, ordered row representation
///
/// ## Error Handling
///
/// Open failures surface as `SqlzooError::Connection`, statement failures as
/// `SqlzooError::Query`.
pub mod connection;
pub mod query;
pub mod row;

pub use connection::*;
pub use query::*;
pub use row::*;
