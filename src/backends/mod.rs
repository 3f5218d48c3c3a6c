//! Database backend implementations
//!
//! This module contains the engine-bound half of the crate: connection and
//! statement handles for the embedded SQLite engine.

pub mod sqlite;

pub use sqlite::{
    ColumnKind, ColumnType, Connection, CursorState, MappedRows, Rows, Statement,
};
