//! Convenience facade in the style of classic PHP database APIs
//!
//! [`DbConnect`] takes whole SQL strings and hands back fully materialized
//! [`QueryResults`]; failures are reported through `error_message` rather than
//! as errors. Everything here is built on [`Connection`] and [`Statement`]; use
//! those directly for bound parameters and streaming.
//!
//! [`Statement`]: crate::backends::Statement

use crate::backends::{Connection, Statement};
use crate::core::database::Database;
use crate::core::error::{DatabaseError, Result};
use crate::core::value::{DatabaseResult, DatabaseRow};
use std::path::Path;

/// A materialized result set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    /// Number of rows in `results`
    pub num_rows: usize,
    /// Number of columns per row
    pub num_fields: usize,
    /// Engine message of the failure, empty on success
    pub error_message: String,
    /// Rows in engine order, each keyed by column name
    pub results: DatabaseResult,
    /// Column names in select order
    pub fields: Vec<String>,
    cursor: usize,
}

impl QueryResults {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the query that filled this set failed
    pub fn is_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Rewind the `fetch_array` cursor to the first row
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A connection that runs raw SQL strings
#[derive(Debug)]
pub struct DbConnect {
    db: Connection,
}

impl DbConnect {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            db: Connection::open(path)?,
        })
    }

    /// Wrap an already open connection
    pub fn from_connection(db: Connection) -> Self {
        Self { db }
    }

    /// Run SQL and discard any rows
    pub fn query(&self, sql: &str) -> Result<()> {
        self.db.execute(sql)
    }

    /// Run a query and materialize its rows into `results`
    ///
    /// `sql` may hold several statements; they run in order and `results` holds
    /// the rows of the last one. Returns `true` on success. On failure `results`
    /// is left empty with the engine's message in `error_message`; statements
    /// before the failing one have already run.
    pub fn query_into(&self, results: &mut QueryResults, sql: &str) -> bool {
        results.clear();
        match self.collect(sql) {
            Ok((fields, rows)) => {
                results.num_rows = rows.len();
                results.num_fields = fields.len();
                results.fields = fields;
                results.results = rows;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, sql, "query failed");
                results.error_message = e.message();
                false
            }
        }
    }

    // Statements run in order; the result set is the last statement's rows.
    fn collect(&self, sql: &str) -> Result<(Vec<String>, DatabaseResult)> {
        let mut rest = sql;
        let mut collected = None;
        while let Some((mut stmt, tail)) = self.db.prepare_partial(rest)? {
            collected = Some(Self::materialize(&mut stmt)?);
            rest = tail;
        }
        collected.ok_or_else(|| DatabaseError::compile(sql, "no SQL statement to compile"))
    }

    fn materialize(stmt: &mut Statement<'_>) -> Result<(Vec<String>, DatabaseResult)> {
        let fields = stmt.column_names();
        let rows = stmt.map_rows(|row| {
            Ok(fields
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.value(i)))
                .collect::<DatabaseRow>())
        })?;
        Ok((fields, rows))
    }

    /// Return the next row of `results`, advancing its cursor
    pub fn fetch_array(&self, results: &mut QueryResults) -> Option<DatabaseRow> {
        let row = results.results.get(results.cursor).cloned()?;
        results.cursor += 1;
        Some(row)
    }

    /// Row id of the most recent INSERT
    pub fn last_rowid(&self) -> i64 {
        self.db.last_insert_rowid()
    }

    /// Check whether a table exists; lookup failures read as "no"
    pub fn does_table_exist(&self, name: &str) -> bool {
        self.db.table_exists(name).unwrap_or(false)
    }

    /// The underlying connection, for prepared statements and transactions
    pub fn database(&self) -> &Connection {
        &self.db
    }

    /// Take back the underlying connection
    pub fn into_inner(self) -> Connection {
        self.db
    }
}

impl Database for DbConnect {
    fn execute(&self, sql: &str) -> Result<()> {
        self.db.execute(sql)
    }

    fn is_autocommit(&self) -> bool {
        self.db.is_autocommit()
    }
}

/// Escape a string for use inside a single-quoted SQL literal
///
/// Prefer bound parameters; this exists for code that must build SQL text.
pub fn sql_escape(input: &str) -> String {
    input.replace('\'', "''")
}
