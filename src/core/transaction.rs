//! Transaction guard for automatic rollback on drop
//!
//! This module provides RAII-style transaction management with automatic rollback.

use super::database::Database;
use super::error::Result;

/// How `BEGIN` acquires locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionBehavior {
    /// Locks are taken on first read/write
    #[default]
    Deferred,
    /// A write lock is taken immediately
    Immediate,
    /// An exclusive lock is taken immediately
    Exclusive,
}

impl TransactionBehavior {
    fn begin_sql(self) -> &'static str {
        match self {
            TransactionBehavior::Deferred => "BEGIN DEFERRED",
            TransactionBehavior::Immediate => "BEGIN IMMEDIATE",
            TransactionBehavior::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

/// Transaction guard that automatically rolls back on drop if not resolved
///
/// If the guard is dropped without calling `commit()` or `rollback()` (an early
/// return through `?`, or a panic), the transaction is rolled back, so no
/// half-applied transaction survives.
///
/// # Example
///
/// ```rust
/// use rust_sqlite_access::prelude::*;
///
/// fn transfer(conn: &Connection) -> Result<()> {
///     let tx = TransactionGuard::begin(conn)?;
///
///     tx.execute("UPDATE accounts SET balance = balance - 100 WHERE id = 1")?;
///     tx.execute("UPDATE accounts SET balance = balance + 100 WHERE id = 2")?;
///
///     tx.commit() // Explicitly commit
/// }
/// # let conn = Connection::open_in_memory()?;
/// # conn.execute("CREATE TABLE accounts (id INTEGER PRIMARY KEY, balance REAL)")?;
/// # transfer(&conn)?;
/// # Ok::<(), DatabaseError>(())
/// ```
#[must_use = "dropping the guard immediately rolls the transaction back"]
pub struct TransactionGuard<'db, D: Database + ?Sized> {
    db: &'db D,
    pending: bool,
}

impl<'db, D: Database + ?Sized> TransactionGuard<'db, D> {
    /// Begin a new deferred transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already active or the engine fails
    pub fn begin(db: &'db D) -> Result<Self> {
        Self::begin_with(db, TransactionBehavior::Deferred)
    }

    /// Begin a new transaction with the given locking behavior
    pub fn begin_with(db: &'db D, behavior: TransactionBehavior) -> Result<Self> {
        db.execute(behavior.begin_sql())?;
        tracing::debug!(?behavior, "transaction started");

        Ok(Self { db, pending: true })
    }

    /// Execute SQL within the transaction
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.db.execute(sql)
    }

    /// The database this transaction runs on
    pub fn database(&self) -> &'db D {
        self.db
    }

    /// Commit the transaction
    ///
    /// If COMMIT fails the transaction is still open; the guard is dropped while
    /// pending and rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails
    pub fn commit(mut self) -> Result<()> {
        self.db.execute("COMMIT")?;
        self.pending = false;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Explicitly rollback the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails
    pub fn rollback(mut self) -> Result<()> {
        self.db.execute("ROLLBACK")?;
        self.pending = false;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    /// Check if the transaction is still waiting for commit or rollback
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl<D: Database + ?Sized> Drop for TransactionGuard<'_, D> {
    fn drop(&mut self) {
        if !self.pending {
            return;
        }
        self.pending = false;

        // Some failures (e.g. SQLITE_FULL) make the engine roll back on its own.
        if self.db.is_autocommit() {
            tracing::warn!("transaction guard dropped after the engine ended the transaction");
            return;
        }

        tracing::warn!("transaction guard dropped without commit or rollback; rolling back");
        if let Err(e) = self.db.execute("ROLLBACK") {
            tracing::error!(error = %e, "automatic rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::sqlite::Connection;

    fn count(conn: &Connection) -> i64 {
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM test").unwrap();
        stmt.column::<i64>(0).unwrap()[0]
    }

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, value TEXT)")
            .unwrap();
        conn
    }

    #[test]
    fn test_transaction_guard_commit() {
        let conn = setup();

        {
            let tx = TransactionGuard::begin(&conn).unwrap();
            assert!(tx.is_pending());
            tx.execute("INSERT INTO test (value) VALUES ('test1')")
                .unwrap();
            tx.commit().unwrap();
        }

        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_transaction_guard_rollback_on_drop() {
        let conn = setup();

        {
            let tx = TransactionGuard::begin(&conn).unwrap();
            tx.execute("INSERT INTO test (value) VALUES ('test1')")
                .unwrap();
            // Drop without commit - should rollback
        }

        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_transaction_guard_explicit_rollback() {
        let conn = setup();

        let tx = TransactionGuard::begin(&conn).unwrap();
        tx.execute("INSERT INTO test (value) VALUES ('test1')")
            .unwrap();
        tx.rollback().unwrap();

        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_nested_begin_fails() {
        let conn = setup();

        let _tx = TransactionGuard::begin(&conn).unwrap();
        let err = TransactionGuard::begin(&conn).err().unwrap();
        assert!(err.message().contains("within a transaction"));
    }

    #[test]
    fn test_begin_immediate() {
        let conn = setup();

        let tx = TransactionGuard::begin_with(&conn, TransactionBehavior::Immediate).unwrap();
        assert!(conn.in_transaction());
        tx.commit().unwrap();
        assert!(!conn.in_transaction());
    }

    #[test]
    fn test_drop_after_engine_ended_transaction() {
        let conn = setup();

        let tx = TransactionGuard::begin(&conn).unwrap();
        // Ending the transaction behind the guard's back must not make drop fail.
        conn.execute("ROLLBACK").unwrap();
        drop(tx);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn test_transaction_helper() {
        let conn = setup();

        let inserted = conn
            .transaction(|c| {
                c.execute("INSERT INTO test (value) VALUES ('a')")?;
                c.execute("INSERT INTO test (value) VALUES ('b')")?;
                Ok(2)
            })
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(count(&conn), 2);

        let result: Result<()> = conn.transaction(|c| {
            c.execute("INSERT INTO test (value) VALUES ('c')")?;
            c.execute("INSERT INTO missing (value) VALUES ('d')")
        });
        assert!(result.is_err());
        assert_eq!(count(&conn), 2);
    }
}
