//! Prepared statements and the step cursor
//!
//! A [`Statement`] owns one compiled query and borrows the [`Connection`] that
//! compiled it, so it can never outlive that connection.
//!
//! The cursor moves through three states:
//!
//! ```text
//!            step() = true            step() = false / error
//!  Ready ─────────────────▶ HasRow ─────────────────────────▶ Exhausted
//!    ▲  ◀──── step() = true ──┘                                   │
//!    └────────────────────────── reset() ◀────────────────────────┘
//! ```
//!
//! [`Connection`]: super::Connection

use super::column::ColumnType;
use super::raw::RawStatement;
use super::Connection;
use crate::core::config::UnknownParameterPolicy;
use crate::core::error::{DatabaseError, Result};
use crate::core::value::DatabaseValue;
use rusqlite::ffi;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_int;

/// Position of a statement's cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No row fetched since the last reset
    Ready,
    /// A row is available for column extraction
    HasRow,
    /// No more rows; stays here until `reset`
    Exhausted,
}

/// A compiled, reusable SQL statement
///
/// Not `Clone`; it may be moved, but never past the lifetime of its connection.
pub struct Statement<'conn> {
    raw: RawStatement,
    sql: String,
    state: CursorState,
    unknown_parameter: UnknownParameterPolicy,
    _conn: PhantomData<&'conn Connection>,
}

impl<'conn> Statement<'conn> {
    pub(super) fn new(raw: RawStatement, sql: &str, policy: UnknownParameterPolicy) -> Self {
        Self {
            raw,
            sql: sql.trim().to_string(),
            state: CursorState::Ready,
            unknown_parameter: policy,
            _conn: PhantomData,
        }
    }

    /// The compiled SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Current cursor state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// How `bind_named` treats names that match no placeholder
    pub fn unknown_parameter_policy(&self) -> UnknownParameterPolicy {
        self.unknown_parameter
    }

    /// Override the unknown-parameter policy inherited from the connection
    pub fn set_unknown_parameter_policy(&mut self, policy: UnknownParameterPolicy) {
        self.unknown_parameter = policy;
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Advance the cursor by one row
    ///
    /// Returns `Ok(true)` when a row is available, `Ok(false)` once execution has
    /// completed. From `Exhausted` this returns `Ok(false)` without running the
    /// statement again; call [`reset`](Self::reset) to start over.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::ExecutionError`] with the engine's message when
    /// execution fails (e.g. a constraint violation). The cursor is then `Exhausted`.
    pub fn step(&mut self) -> Result<bool> {
        if self.state == CursorState::Exhausted {
            return Ok(false);
        }

        match self.raw.step() {
            ffi::SQLITE_ROW => {
                self.state = CursorState::HasRow;
                Ok(true)
            }
            ffi::SQLITE_DONE => {
                self.state = CursorState::Exhausted;
                Ok(false)
            }
            _ => {
                self.state = CursorState::Exhausted;
                let err = DatabaseError::execution(self.raw.extended_errcode(), self.raw.errmsg());
                tracing::debug!(sql = %self.sql, error = %err, "step failed");
                Err(err)
            }
        }
    }

    /// Return the cursor to `Ready`
    ///
    /// Valid from any state and idempotent. Bound values are kept.
    pub fn reset(&mut self) {
        // The return code repeats the last step error, which step() already reported.
        self.raw.reset();
        self.state = CursorState::Ready;
    }

    /// Step until the statement completes, discarding any rows, then reset
    ///
    /// Returns the number of rows that were produced.
    pub fn execute(&mut self) -> Result<usize> {
        self.for_each_row(|_| Ok(()))
    }

    // ------------------------------------------------------------------
    // Binding
    // ------------------------------------------------------------------

    /// Bind a value to the 1-based parameter `index`
    ///
    /// Rebinding an index overwrites the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::BindError`] if the cursor is not `Ready` or the engine
    /// rejects the index.
    pub fn bind<V: Into<DatabaseValue>>(&mut self, index: usize, value: V) -> Result<()> {
        let raw_index = c_int::try_from(index)
            .map_err(|_| DatabaseError::bind(index, "parameter index out of range"))?;
        self.bind_raw(raw_index, &index.to_string(), &value.into())
    }

    /// Bind a value to a named placeholder such as `:name`, `@name` or `$name`
    ///
    /// The name is resolved to its index when this is called. What happens when it
    /// matches no placeholder depends on the statement's [`UnknownParameterPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::UnknownParameter`] for an unresolved name under
    /// [`UnknownParameterPolicy::Error`], or a bind error from the engine.
    pub fn bind_named<V: Into<DatabaseValue>>(&mut self, name: &str, value: V) -> Result<()> {
        match self.raw.bind_parameter_index(name) {
            Some(index) => self.bind_raw(index, name, &value.into()),
            None => match self.unknown_parameter {
                UnknownParameterPolicy::Error => Err(DatabaseError::unknown_parameter(name)),
                UnknownParameterPolicy::Ignore => {
                    tracing::debug!(parameter = name, sql = %self.sql, "ignoring unknown named parameter");
                    Ok(())
                }
            },
        }
    }

    /// Bind a sequence of values to parameters 1, 2, 3, ...
    pub fn bind_values<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<DatabaseValue>,
    {
        for (offset, value) in values.into_iter().enumerate() {
            self.bind(offset + 1, value)?;
        }
        Ok(())
    }

    /// Reset every parameter to NULL
    pub fn clear_bindings(&mut self) {
        self.raw.clear_bindings();
    }

    /// Number of parameters in the statement (the largest index)
    pub fn parameter_count(&self) -> usize {
        self.raw.bind_parameter_count()
    }

    /// 1-based index of a named placeholder, if the statement has one
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.raw.bind_parameter_index(name).map(|i| i as usize)
    }

    fn bind_raw(&mut self, index: c_int, parameter: &str, value: &DatabaseValue) -> Result<()> {
        if self.state != CursorState::Ready {
            return Err(DatabaseError::bind(
                parameter,
                "statement must be reset before binding",
            ));
        }

        let rc = match value {
            DatabaseValue::Null => self.raw.bind_null(index),
            DatabaseValue::Integer(v) => self.raw.bind_int64(index, *v),
            DatabaseValue::Double(v) => self.raw.bind_double(index, *v),
            DatabaseValue::Text(v) => self.raw.bind_text(index, v),
        };

        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(DatabaseError::bind(parameter, self.raw.errmsg()))
        }
    }

    // ------------------------------------------------------------------
    // Column extraction
    // ------------------------------------------------------------------

    /// Number of columns in the result
    pub fn column_count(&self) -> usize {
        self.raw.column_count()
    }

    /// Name of a result column
    pub fn column_name(&self, index: usize) -> Option<String> {
        self.column_index(index)
            .and_then(|col| self.raw.column_name(col))
    }

    /// Names of all result columns, in order
    pub fn column_names(&self) -> Vec<String> {
        (0..self.column_count())
            .map(|i| self.column_name(i).unwrap_or_default())
            .collect()
    }

    /// Read column `index` of the current row as `T`
    ///
    /// Outside `HasRow`, or for an out-of-range column, this yields `T`'s neutral
    /// value instead of touching the engine.
    pub fn get<T: ColumnType>(&self, index: usize) -> T {
        T::extract(self, index)
    }

    /// Read column `index` as an integer (0 when unavailable)
    pub fn get_int(&self, index: usize) -> i64 {
        self.readable(index)
            .map(|col| self.raw.column_int64(col))
            .unwrap_or(0)
    }

    /// Read column `index` as a double (0.0 when unavailable)
    pub fn get_double(&self, index: usize) -> f64 {
        self.readable(index)
            .map(|col| self.raw.column_double(col))
            .unwrap_or(0.0)
    }

    /// Read column `index` as text
    ///
    /// NULL reads as an empty string, so it cannot be told apart from `''`; use
    /// [`is_null`](Self::is_null) or [`value`](Self::value) when that matters.
    pub fn get_text(&self, index: usize) -> String {
        self.readable(index)
            .map(|col| self.raw.column_text(col))
            .unwrap_or_default()
    }

    /// Check whether column `index` of the current row is NULL
    pub fn is_null(&self, index: usize) -> bool {
        self.readable(index)
            .map(|col| self.raw.column_type(col) == ffi::SQLITE_NULL)
            .unwrap_or(true)
    }

    /// Read column `index` with its storage class preserved
    ///
    /// Blobs are read as (lossy UTF-8) text.
    pub fn value(&self, index: usize) -> DatabaseValue {
        let Some(col) = self.readable(index) else {
            return DatabaseValue::Null;
        };
        match self.raw.column_type(col) {
            ffi::SQLITE_INTEGER => DatabaseValue::Integer(self.raw.column_int64(col)),
            ffi::SQLITE_FLOAT => DatabaseValue::Double(self.raw.column_double(col)),
            ffi::SQLITE_NULL => DatabaseValue::Null,
            _ => DatabaseValue::Text(self.raw.column_text(col)),
        }
    }

    fn column_index(&self, index: usize) -> Option<c_int> {
        if index < self.column_count() {
            c_int::try_from(index).ok()
        } else {
            None
        }
    }

    fn readable(&self, index: usize) -> Option<c_int> {
        if self.state == CursorState::HasRow {
            self.column_index(index)
        } else {
            None
        }
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("state", &self.state)
            .field("unknown_parameter", &self.unknown_parameter)
            .finish()
    }
}
