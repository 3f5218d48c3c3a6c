//! Row iteration and mapping
//!
//! [`Rows`] walks a statement's cursor and resets it when dropped, whether the walk
//! finished, returned early with an error, or unwound from a panic. Everything that
//! iterates a statement (`for_each_row`, `map_rows`, `query_map`, `column`) goes
//! through it, so a statement is always `Ready` again afterwards.

use super::statement::Statement;
use crate::core::error::Result;

/// A cursor walk over a statement's remaining rows
///
/// Each call to [`next`](Rows::next) hands out a shared borrow of the statement
/// positioned on a row. The borrow only permits column reads, so the row cannot
/// advance the cursor underneath the walk.
pub struct Rows<'stmt, 'conn> {
    stmt: &'stmt mut Statement<'conn>,
}

impl<'stmt, 'conn> Rows<'stmt, 'conn> {
    pub(super) fn new(stmt: &'stmt mut Statement<'conn>) -> Self {
        Self { stmt }
    }

    /// Advance to the next row
    ///
    /// Returns `Ok(None)` once the rows are exhausted; further calls keep
    /// returning `Ok(None)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<&Statement<'conn>>> {
        if self.stmt.step()? {
            Ok(Some(&*self.stmt))
        } else {
            Ok(None)
        }
    }
}

impl Drop for Rows<'_, '_> {
    fn drop(&mut self) {
        self.stmt.reset();
    }
}

/// Lazy iterator applying a mapping function to each row
///
/// Created by [`Statement::query_map`]. Yields `Err` once if stepping fails and
/// then ends.
pub struct MappedRows<'stmt, 'conn, F> {
    rows: Rows<'stmt, 'conn>,
    map: F,
}

impl<T, F> Iterator for MappedRows<'_, '_, F>
where
    F: FnMut(&Statement<'_>) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let map = &mut self.map;
        match self.rows.next() {
            Ok(Some(row)) => Some(map(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'conn> Statement<'conn> {
    /// Start a cursor walk over the remaining rows
    ///
    /// The statement is reset when the returned [`Rows`] is dropped.
    ///
    /// ```rust
    /// # use rust_sqlite_access::prelude::*;
    /// let conn = Connection::open_in_memory()?;
    /// let mut stmt = conn.prepare("SELECT 1 UNION ALL SELECT 2")?;
    ///
    /// let mut total = 0;
    /// let mut rows = stmt.rows();
    /// while let Some(row) = rows.next()? {
    ///     total += row.get_int(0);
    /// }
    /// assert_eq!(total, 3);
    /// # Ok::<(), DatabaseError>(())
    /// ```
    pub fn rows(&mut self) -> Rows<'_, 'conn> {
        Rows::new(self)
    }

    /// Call `f` for every remaining row, then reset
    ///
    /// Returns the number of rows visited. An error from `f` or from stepping stops
    /// the walk and is returned; the statement is reset in every case.
    pub fn for_each_row<F>(&mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(&Statement<'conn>) -> Result<()>,
    {
        let mut rows = self.rows();
        let mut visited = 0;
        while let Some(row) = rows.next()? {
            f(row)?;
            visited += 1;
        }
        Ok(visited)
    }

    /// Map every remaining row through `mapper`, collecting the results in cursor order
    ///
    /// # Example
    ///
    /// ```rust
    /// # use rust_sqlite_access::prelude::*;
    /// struct Player {
    ///     id: i64,
    ///     name: String,
    /// }
    ///
    /// let conn = Connection::open_in_memory()?;
    /// conn.execute("CREATE TABLE players (id INTEGER PRIMARY KEY, name TEXT);
    ///               INSERT INTO players (name) VALUES ('Alice'), ('Bob');")?;
    ///
    /// let mut stmt = conn.prepare("SELECT id, name FROM players ORDER BY id")?;
    /// let players = stmt.map_rows(|row| {
    ///     Ok(Player {
    ///         id: row.get_int(0),
    ///         name: row.get_text(1),
    ///     })
    /// })?;
    /// assert_eq!(players.len(), 2);
    /// assert_eq!(players[1].name, "Bob");
    /// # Ok::<(), DatabaseError>(())
    /// ```
    pub fn map_rows<T, F>(&mut self, mut mapper: F) -> Result<Vec<T>>
    where
        F: FnMut(&Statement<'conn>) -> Result<T>,
    {
        let mut results = Vec::new();
        self.for_each_row(|row| {
            results.push(mapper(row)?);
            Ok(())
        })?;
        Ok(results)
    }

    /// Lazily map rows through `f`
    ///
    /// Rows are stepped as the iterator is consumed; dropping it resets the statement.
    pub fn query_map<T, F>(&mut self, f: F) -> MappedRows<'_, 'conn, F>
    where
        F: FnMut(&Statement<'_>) -> Result<T>,
    {
        MappedRows {
            rows: self.rows(),
            map: f,
        }
    }
}
