//! # Rust SQLite Access
//!
//! A resource-safe access layer over the embedded SQLite engine. It gives callers
//! exclusive-ownership connection handles, prepared statements with positional and
//! named parameter binding, a row cursor for streaming results, and a generic way of
//! mapping rows into their own types.
//!
//! ## Features
//!
//! - **Owned handles**: a [`Connection`] owns exactly one engine handle and releases
//!   it once; a [`Statement`] borrows its connection and cannot outlive it
//! - **Step cursor**: `Ready` → `HasRow` → `Exhausted`, with `reset` back to `Ready`
//! - **Row mapping**: `for_each_row`, `map_rows`, lazy `query_map`, and typed
//!   `column::<T>` over {`i64`, `f64`, `String`}
//! - **Transactions**: [`TransactionGuard`] rolls back unless committed
//! - **Legacy facade**: [`facade::DbConnect`] for whole-string queries
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_sqlite_access::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let conn = Connection::open_in_memory()?;
//!     conn.execute("CREATE TABLE players (id INTEGER PRIMARY KEY, name TEXT)")?;
//!
//!     // Insert inside a transaction, reusing one prepared statement
//!     {
//!         let tx = TransactionGuard::begin(&conn)?;
//!         let mut insert = conn.prepare("INSERT INTO players (name) VALUES (:name)")?;
//!         for name in ["Alice", "Bob"] {
//!             insert.bind_named(":name", name)?;
//!             insert.execute()?;
//!         }
//!         tx.commit()?;
//!     }
//!
//!     // Map rows into tuples
//!     let mut select = conn.prepare("SELECT id, name FROM players ORDER BY id")?;
//!     let players = select.map_rows(|row| Ok((row.get_int(0), row.get_text(1))))?;
//!     assert_eq!(players, vec![(1, "Alice".to_string()), (2, "Bob".to_string())]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Threading
//!
//! Everything is synchronous and single-threaded. A connection is used by one
//! thread of control at a time; statements are neither `Send` nor `Sync`.
//!
//! ## Project Structure
//!
//! ```text
//! rust_sqlite_access/
//! ├── src/
//! │   ├── core/              # Engine-independent types
//! │   │   ├── config.rs      # Connection settings and builder
//! │   │   ├── database.rs    # Database trait
//! │   │   ├── error.rs       # Error types
//! │   │   ├── transaction.rs # Transaction guard
//! │   │   └── value.rs       # Value types
//! │   ├── backends/
//! │   │   └── sqlite/        # Connection, Statement, Rows, column extraction
//! │   ├── facade.rs          # Whole-string query facade
//! │   └── lib.rs
//! ├── demos/                 # Example programs
//! ├── tests/                 # Integration and property tests
//! └── benches/               # Criterion benchmarks
//! ```

/// Core database system types and traits
pub mod core;

/// Database backend implementations
pub mod backends;

/// Whole-string query facade
pub mod facade;

/// Prelude for convenient imports
///
/// ```rust
/// use rust_sqlite_access::prelude::*;
///
/// let conn = Connection::open_in_memory()?;
/// conn.execute("CREATE TABLE t (x INTEGER)")?;
/// # Ok::<(), DatabaseError>(())
/// ```
pub mod prelude {
    pub use crate::backends::{ColumnKind, ColumnType, Connection, CursorState, Statement};
    pub use crate::core::{
        ConnectionBuilder, ConnectionConfig, Database, DatabaseError, DatabaseResult,
        DatabaseRow, DatabaseValue, Result, TransactionBehavior, TransactionGuard,
        UnknownParameterPolicy,
    };
}

// Re-export at root level for convenience
pub use self::backends::{ColumnKind, ColumnType, Connection, CursorState, Statement};
pub use self::core::{
    ConnectionBuilder, ConnectionConfig, Database, DatabaseError, DatabaseResult, DatabaseRow,
    DatabaseValue, Result, TransactionBehavior, TransactionGuard, UnknownParameterPolicy,
};
