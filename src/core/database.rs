//! Database trait
//!
//! The minimal surface the transaction guard needs: running raw SQL and asking
//! the engine whether a transaction is open.

use super::error::Result;
use super::transaction::TransactionGuard;

/// Anything that can run raw SQL against one engine handle
///
/// # Thread Safety
/// Implementations are single-threaded. One logical thread of control uses a
/// connection at a time; sharing one across threads needs external synchronization.
pub trait Database {
    /// Execute one or more statements, discarding any result rows
    ///
    /// # Security Warning
    ///
    /// **SQL Injection Risk**: the text is executed as-is. Use a prepared statement
    /// with bound parameters for anything derived from user input.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Check whether the engine is in autocommit mode (no transaction open)
    fn is_autocommit(&self) -> bool;

    /// Check if currently in a transaction
    fn in_transaction(&self) -> bool {
        !self.is_autocommit()
    }

    /// Run `f` inside a transaction
    ///
    /// Commits when `f` returns `Ok`; when it returns `Err` (or panics) the
    /// transaction is rolled back and the error is passed through.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T>,
    {
        let guard = TransactionGuard::begin(self)?;
        let value = f(self)?;
        guard.commit()?;
        Ok(value)
    }
}
