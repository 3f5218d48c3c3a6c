//! SQLite connection handle
//!
//! A [`Connection`] is the single owner of one open database handle. Dropping it
//! (or calling [`Connection::close`]) releases the handle exactly once.

use super::raw::RawStatement;
use super::statement::Statement;
use crate::core::config::{ConnectionConfig, UnknownParameterPolicy};
use crate::core::database::Database;
use crate::core::error::{DatabaseError, Result};
use std::fmt;
use std::path::Path;

/// An open SQLite database
///
/// Not `Clone` and not `Sync`: one logical thread of control uses a connection at
/// a time. Moving a connection transfers ownership of the handle.
pub struct Connection {
    conn: rusqlite::Connection,
    path: String,
    unknown_parameter: UnknownParameterPolicy,
}

impl Connection {
    /// Open (or create) the database file at `path` with default settings
    ///
    /// `path` is always a plain filename; `file:` URIs are not interpreted. An empty
    /// path opens a private temporary database, `:memory:` an in-memory one.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::OpenError`] with the engine's message if the file
    /// cannot be opened or is not a valid database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();
        Self::open_with_config(&ConnectionConfig::new(path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_config(&ConnectionConfig::default())
    }

    /// Open a database with explicit settings
    pub fn open_with_config(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let open_error = |e: rusqlite::Error| DatabaseError::open(&config.path, engine_text(e));

        let conn =
            rusqlite::Connection::open_with_flags(&*config.engine_path(), config.open_flags())
                .map_err(open_error)?;

        // The engine opens lazily; read the header now so a bad file fails here.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(open_error)?;

        if config.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON")
                .map_err(open_error)?;
        }
        if let Some(timeout) = config.busy_timeout() {
            conn.busy_timeout(timeout).map_err(open_error)?;
        }

        tracing::debug!(path = %config.path, read_only = config.read_only, "opened database");

        Ok(Self {
            conn,
            path: config.path.clone(),
            unknown_parameter: config.unknown_parameter,
        })
    }

    /// Path this connection was opened with
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run one or more SQL statements without parameters, discarding result rows
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::ExecutionError`] carrying the engine's message on a
    /// syntax error, constraint violation or other engine failure.
    pub fn execute(&self, sql: &str) -> Result<()> {
        tracing::debug!(sql, "execute");
        self.conn
            .execute_batch(sql)
            .map_err(DatabaseError::from_engine)
    }

    /// Compile the first statement in `sql`
    ///
    /// Only the first statement is compiled. Any SQL after it is **not** run: it is
    /// dropped with a `warn` log entry. Use [`execute`](Self::execute) for scripts.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::CompileError`] with the engine's message if the SQL
    /// does not compile or contains no statement.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        let (stmt, rest) = self
            .prepare_partial(sql)?
            .ok_or_else(|| DatabaseError::compile(sql, "no SQL statement to compile"))?;
        if !rest.trim().is_empty() {
            tracing::warn!(ignored = rest.trim(), "prepare compiles only the first statement");
        }
        Ok(stmt)
    }

    /// Compile the first statement in `sql` and hand back the uncompiled remainder
    ///
    /// `Ok(None)` when `sql` holds only whitespace or comments.
    pub(crate) fn prepare_partial<'sql>(
        &self,
        sql: &'sql str,
    ) -> Result<Option<(Statement<'_>, &'sql str)>> {
        // SAFETY: the handle is valid for as long as `self` is borrowed, and the
        // returned statement borrows `self`.
        let compiled = unsafe { RawStatement::prepare(self.conn.handle(), sql)? };
        Ok(compiled.map(|compiled| {
            let (text, rest) = sql.split_at(compiled.consumed);
            tracing::debug!(sql = text.trim(), "prepared statement");
            (
                Statement::new(compiled.stmt, text, self.unknown_parameter),
                rest,
            )
        }))
    }

    /// Row id of the most recent successful INSERT on this connection
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Number of rows modified by the most recent INSERT, UPDATE or DELETE
    pub fn changes(&self) -> u64 {
        self.conn.changes()
    }

    /// Check whether a table with this name exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let mut stmt =
            self.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        stmt.bind(1, name)?;
        let found = stmt.step()?;
        stmt.reset();
        Ok(found)
    }

    /// Check whether the engine is in autocommit mode (no transaction open)
    pub fn is_autocommit(&self) -> bool {
        self.conn.is_autocommit()
    }

    /// Release the handle now, reporting a close failure instead of ignoring it
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| DatabaseError::from_engine(e))?;
        tracing::debug!(path = %path, "closed database");
        Ok(())
    }
}

impl Database for Connection {
    fn execute(&self, sql: &str) -> Result<()> {
        Connection::execute(self, sql)
    }

    fn is_autocommit(&self) -> bool {
        Connection::is_autocommit(self)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("path", &self.path)
            .field("autocommit", &self.conn.is_autocommit())
            .finish()
    }
}

/// The engine's own message for a rusqlite failure
fn engine_text(err: rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => message,
        other => other.to_string(),
    }
}
