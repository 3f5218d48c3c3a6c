//! SQLite backend
//!
//! Owned connection handles, prepared statements with a step cursor, row
//! mapping and typed column extraction over the embedded SQLite engine.

pub mod column;
pub mod connection;
mod raw;
pub mod rows;
pub mod statement;

pub use column::{ColumnKind, ColumnType};
pub use connection::Connection;
pub use rows::{MappedRows, Rows};
pub use statement::{CursorState, Statement};
