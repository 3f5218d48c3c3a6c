//! Error types for the access layer
//!
//! Every engine-reported failure is surfaced as a [`DatabaseError`] carrying the
//! engine's own message text. Nothing here is retried or recovered internally.

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Error types for database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The database file could not be opened, created or validated
    #[error("Failed to open database '{path}': {message}")]
    OpenError { path: String, message: String },

    /// SQL failed to compile into a prepared statement
    #[error("Failed to compile SQL: {message}")]
    CompileError { sql: String, message: String },

    /// A statement failed while executing
    #[error("Execution error: {message}")]
    ExecutionError {
        /// Extended SQLite result code
        code: i32,
        message: String,
    },

    /// The engine rejected a parameter binding
    #[error("Failed to bind parameter {parameter}: {message}")]
    BindError { parameter: String, message: String },

    /// A named parameter did not resolve to any placeholder in the statement
    #[error("Unknown named parameter: {0}")]
    UnknownParameter(String),

    /// Invalid connection configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by rusqlite outside the typed categories above
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    /// Create an open error
    pub fn open<P: Into<String>, S: Into<String>>(path: P, msg: S) -> Self {
        DatabaseError::OpenError {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a compile error for the given SQL text
    pub fn compile<Q: Into<String>, S: Into<String>>(sql: Q, msg: S) -> Self {
        DatabaseError::CompileError {
            sql: sql.into(),
            message: msg.into(),
        }
    }

    /// Create an execution error with the engine's result code
    pub fn execution<S: Into<String>>(code: i32, msg: S) -> Self {
        DatabaseError::ExecutionError {
            code,
            message: msg.into(),
        }
    }

    /// Create a bind error
    pub fn bind<P: ToString, S: Into<String>>(parameter: P, msg: S) -> Self {
        DatabaseError::BindError {
            parameter: parameter.to_string(),
            message: msg.into(),
        }
    }

    /// Create an unknown named parameter error
    pub fn unknown_parameter<S: Into<String>>(name: S) -> Self {
        DatabaseError::UnknownParameter(name.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DatabaseError::Config(msg.into())
    }

    /// Build an execution error from a rusqlite failure, keeping the engine's text
    pub(crate) fn from_engine(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, Some(message)) => {
                DatabaseError::execution(code.extended_code, message)
            }
            rusqlite::Error::SqliteFailure(code, None) => {
                DatabaseError::execution(code.extended_code, code.to_string())
            }
            other => DatabaseError::SqliteError(other),
        }
    }

    /// The message text without the category prefix added by `Display`
    ///
    /// For engine-reported failures this is the engine's native message.
    pub fn message(&self) -> String {
        match self {
            DatabaseError::OpenError { message, .. }
            | DatabaseError::CompileError { message, .. }
            | DatabaseError::ExecutionError { message, .. }
            | DatabaseError::BindError { message, .. } => message.clone(),
            DatabaseError::UnknownParameter(name) => format!("no such parameter: {}", name),
            DatabaseError::Config(message) => message.clone(),
            DatabaseError::IoError(e) => e.to_string(),
            DatabaseError::SqliteError(e) => e.to_string(),
            DatabaseError::Serialization(e) => e.to_string(),
        }
    }

    /// Extended SQLite result code, when the engine reported one
    pub fn code(&self) -> Option<i32> {
        match self {
            DatabaseError::ExecutionError { code, .. } => Some(*code),
            DatabaseError::SqliteError(rusqlite::Error::SqliteFailure(e, _)) => {
                Some(e.extended_code)
            }
            _ => None,
        }
    }

    /// Check whether the failure was a constraint violation (UNIQUE, NOT NULL, CHECK, ...)
    pub fn is_constraint_violation(&self) -> bool {
        self.code()
            .map(|code| code & 0xff == rusqlite::ffi::SQLITE_CONSTRAINT)
            .unwrap_or(false)
    }
}
