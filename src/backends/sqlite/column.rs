//! Typed column extraction
//!
//! Column reads are restricted to a closed set of Rust types, one per
//! [`ColumnKind`]. The set is sealed; it cannot be extended outside this crate.

use super::statement::Statement;
use crate::core::error::Result;

/// The column types the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Double,
    /// UTF-8 text
    Text,
}

impl ColumnKind {
    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Double => "double",
            ColumnKind::Text => "text",
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// A Rust type that a result column can be read into
pub trait ColumnType: sealed::Sealed + Sized {
    /// Which column kind this type reads
    const KIND: ColumnKind;

    /// Read column `index` of the statement's current row
    fn extract(stmt: &Statement<'_>, index: usize) -> Self;
}

impl ColumnType for i64 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn extract(stmt: &Statement<'_>, index: usize) -> Self {
        stmt.get_int(index)
    }
}

impl ColumnType for f64 {
    const KIND: ColumnKind = ColumnKind::Double;

    fn extract(stmt: &Statement<'_>, index: usize) -> Self {
        stmt.get_double(index)
    }
}

impl ColumnType for String {
    const KIND: ColumnKind = ColumnKind::Text;

    fn extract(stmt: &Statement<'_>, index: usize) -> Self {
        stmt.get_text(index)
    }
}

impl Statement<'_> {
    /// Collect column `index` of every remaining row, then reset
    ///
    /// This is [`map_rows`](Statement::map_rows) reading a single column, with the
    /// same ordering and exhaustion behavior.
    ///
    /// ```rust
    /// # use rust_sqlite_access::prelude::*;
    /// let conn = Connection::open_in_memory()?;
    /// conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY); INSERT INTO t VALUES (1), (2), (3);")?;
    ///
    /// let mut stmt = conn.prepare("SELECT id FROM t ORDER BY id")?;
    /// assert_eq!(stmt.column::<i64>(0)?, vec![1, 2, 3]);
    /// # Ok::<(), DatabaseError>(())
    /// ```
    pub fn column<T: ColumnType>(&mut self, index: usize) -> Result<Vec<T>> {
        tracing::trace!(kind = T::KIND.as_str(), index, "extracting column");
        self.map_rows(|row| Ok(row.get::<T>(index)))
    }
}
