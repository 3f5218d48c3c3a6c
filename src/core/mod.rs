//! Core database system types and traits
//!
//! This module provides the engine-independent building blocks: error types,
//! values, connection configuration, the `Database` trait and the transaction guard.

pub mod config;
pub mod database;
pub mod error;
pub mod transaction;
pub mod value;

// Re-export commonly used types
pub use config::{ConnectionBuilder, ConnectionConfig, UnknownParameterPolicy};
pub use database::Database;
pub use error::{DatabaseError, Result};
pub use transaction::{TransactionBehavior, TransactionGuard};
pub use value::{DatabaseResult, DatabaseRow, DatabaseValue};
