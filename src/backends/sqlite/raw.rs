//! Owning wrapper over a compiled `sqlite3_stmt`
//!
//! This is the only module that talks to the engine's statement API directly.
//! Every other type reaches the engine through [`RawStatement`].

use crate::core::error::{DatabaseError, Result};
use rusqlite::ffi;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr::{self, NonNull};

/// A compiled statement handle, finalized exactly once on drop
///
/// Holds a raw pointer, so it is neither `Send` nor `Sync`.
pub(crate) struct RawStatement {
    ptr: NonNull<ffi::sqlite3_stmt>,
}

/// Result of compiling the first statement of an SQL string
pub(crate) struct Compiled {
    pub(crate) stmt: RawStatement,
    /// Byte length of the SQL consumed by the compiled statement
    pub(crate) consumed: usize,
}

impl RawStatement {
    /// Compile the first statement in `sql`
    ///
    /// Returns `Ok(None)` when `sql` holds no statement (only whitespace or comments).
    ///
    /// # Safety
    ///
    /// `db` must be a valid open connection handle that outlives the returned statement.
    pub(crate) unsafe fn prepare(db: *mut ffi::sqlite3, sql: &str) -> Result<Option<Compiled>> {
        let len = c_int::try_from(sql.len())
            .map_err(|_| DatabaseError::compile(sql, "SQL text is too long"))?;

        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();
        let head = sql.as_ptr() as *const c_char;

        let rc = ffi::sqlite3_prepare_v2(db, head, len, &mut stmt, &mut tail);
        if rc != ffi::SQLITE_OK {
            // A failed prepare leaves no statement behind, but be strict about it.
            ffi::sqlite3_finalize(stmt);
            return Err(DatabaseError::compile(sql, errmsg(db)));
        }

        let consumed = if tail.is_null() {
            sql.len()
        } else {
            tail.offset_from(head) as usize
        };

        Ok(NonNull::new(stmt).map(|ptr| Compiled {
            stmt: RawStatement { ptr },
            consumed,
        }))
    }

    fn as_ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.ptr.as_ptr()
    }

    /// Advance the cursor; returns the raw engine result code
    pub(crate) fn step(&mut self) -> c_int {
        unsafe { ffi::sqlite3_step(self.as_ptr()) }
    }

    /// Rewind to before the first row; bound values are kept
    pub(crate) fn reset(&mut self) -> c_int {
        unsafe { ffi::sqlite3_reset(self.as_ptr()) }
    }

    pub(crate) fn clear_bindings(&mut self) -> c_int {
        unsafe { ffi::sqlite3_clear_bindings(self.as_ptr()) }
    }

    pub(crate) fn bind_null(&mut self, index: c_int) -> c_int {
        unsafe { ffi::sqlite3_bind_null(self.as_ptr(), index) }
    }

    pub(crate) fn bind_int64(&mut self, index: c_int, value: i64) -> c_int {
        unsafe { ffi::sqlite3_bind_int64(self.as_ptr(), index, value) }
    }

    pub(crate) fn bind_double(&mut self, index: c_int, value: f64) -> c_int {
        unsafe { ffi::sqlite3_bind_double(self.as_ptr(), index, value) }
    }

    /// Bind text; the engine takes its own copy of the bytes
    pub(crate) fn bind_text(&mut self, index: c_int, value: &str) -> c_int {
        let Ok(len) = c_int::try_from(value.len()) else {
            return ffi::SQLITE_TOOBIG;
        };
        unsafe {
            ffi::sqlite3_bind_text(
                self.as_ptr(),
                index,
                value.as_ptr() as *const c_char,
                len,
                ffi::SQLITE_TRANSIENT(),
            )
        }
    }

    pub(crate) fn bind_parameter_count(&self) -> usize {
        unsafe { ffi::sqlite3_bind_parameter_count(self.as_ptr()) as usize }
    }

    /// Resolve a placeholder name (prefix included) to its 1-based index
    pub(crate) fn bind_parameter_index(&self, name: &str) -> Option<c_int> {
        let name = CString::new(name).ok()?;
        let index = unsafe { ffi::sqlite3_bind_parameter_index(self.as_ptr(), name.as_ptr()) };
        (index > 0).then_some(index)
    }

    pub(crate) fn column_count(&self) -> usize {
        unsafe { ffi::sqlite3_column_count(self.as_ptr()) as usize }
    }

    pub(crate) fn column_type(&self, col: c_int) -> c_int {
        unsafe { ffi::sqlite3_column_type(self.as_ptr(), col) }
    }

    pub(crate) fn column_int64(&self, col: c_int) -> i64 {
        unsafe { ffi::sqlite3_column_int64(self.as_ptr(), col) }
    }

    pub(crate) fn column_double(&self, col: c_int) -> f64 {
        unsafe { ffi::sqlite3_column_double(self.as_ptr(), col) }
    }

    /// Column as text; NULL reads as an empty string
    pub(crate) fn column_text(&self, col: c_int) -> String {
        unsafe {
            let text = ffi::sqlite3_column_text(self.as_ptr(), col);
            if text.is_null() {
                return String::new();
            }
            // Length must be read after the text pointer, per the engine's conversion rules.
            let len = ffi::sqlite3_column_bytes(self.as_ptr(), col) as usize;
            let bytes = std::slice::from_raw_parts(text, len);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    pub(crate) fn column_name(&self, col: c_int) -> Option<String> {
        unsafe {
            let name = ffi::sqlite3_column_name(self.as_ptr(), col);
            if name.is_null() {
                None
            } else {
                Some(CStr::from_ptr(name).to_string_lossy().into_owned())
            }
        }
    }

    /// Most recent error message of the owning connection
    pub(crate) fn errmsg(&self) -> String {
        unsafe { errmsg(ffi::sqlite3_db_handle(self.as_ptr())) }
    }

    /// Most recent extended result code of the owning connection
    pub(crate) fn extended_errcode(&self) -> c_int {
        unsafe { ffi::sqlite3_extended_errcode(ffi::sqlite3_db_handle(self.as_ptr())) }
    }
}

impl Drop for RawStatement {
    fn drop(&mut self) {
        unsafe {
            ffi::sqlite3_finalize(self.as_ptr());
        }
    }
}

/// Read the connection's current error message
///
/// # Safety
///
/// `db` must be a valid connection handle.
unsafe fn errmsg(db: *mut ffi::sqlite3) -> String {
    let msg = ffi::sqlite3_errmsg(db);
    if msg.is_null() {
        "unknown error".to_string()
    } else {
        CStr::from_ptr(msg).to_string_lossy().into_owned()
    }
}
