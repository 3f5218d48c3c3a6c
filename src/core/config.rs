//! Connection configuration
//!
//! [`ConnectionConfig`] describes how a database file is opened. It can be built
//! fluently with [`ConnectionBuilder`] or loaded from JSON.

use super::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

/// Path that opens a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// What a statement does when `bind_named` is given a name with no placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParameterPolicy {
    /// Fail with [`DatabaseError::UnknownParameter`]
    #[default]
    Error,
    /// Do nothing; a misspelled name leaves the placeholder at its previous value
    Ignore,
}

/// Settings used when opening a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Database file path, or `:memory:`
    pub path: String,
    /// Open without write access
    pub read_only: bool,
    /// Create the file when it does not exist (ignored for read-only connections)
    pub create_if_missing: bool,
    /// Enforce foreign key constraints
    pub foreign_keys: bool,
    /// How long to wait on a locked database before failing, in milliseconds
    pub busy_timeout_ms: Option<u64>,
    /// Policy inherited by every statement prepared on the connection
    pub unknown_parameter: UnknownParameterPolicy,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            path: MEMORY_PATH.to_string(),
            read_only: false,
            create_if_missing: true,
            foreign_keys: true,
            busy_timeout_ms: None,
            unknown_parameter: UnknownParameterPolicy::default(),
        }
    }
}

impl ConnectionConfig {
    /// Default settings for the given path
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse settings from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check the settings for combinations the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.read_only && self.path == MEMORY_PATH {
            return Err(DatabaseError::config(
                "an in-memory database cannot be opened read-only",
            ));
        }
        Ok(())
    }

    /// Whether this configuration targets a private in-memory database
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    /// Busy timeout as a `Duration`
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    /// The path as handed to the engine
    ///
    /// A relative path starting with `file:` gets a `./` prefix so that builds
    /// with URI filenames enabled still treat it as a plain file name.
    pub(crate) fn engine_path(&self) -> Cow<'_, str> {
        if self.path.starts_with("file:") {
            Cow::Owned(format!("./{}", self.path))
        } else {
            Cow::Borrowed(&self.path)
        }
    }

    /// Engine open flags derived from the settings
    pub(crate) fn open_flags(&self) -> rusqlite::OpenFlags {
        use rusqlite::OpenFlags;

        let mut flags = OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }
}

/// Fluent builder for [`ConnectionConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    config: ConnectionConfig,
}

impl ConnectionBuilder {
    /// Create a new builder with default settings (in-memory database)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database file path
    pub fn path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.path = path.into();
        self
    }

    /// Open the database read-only
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Create the file if it does not exist
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Enable or disable foreign key enforcement
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.config.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config.busy_timeout_ms = Some(millis);
        self
    }

    /// Choose how unresolved named parameters are handled
    pub fn unknown_parameter(mut self, policy: UnknownParameterPolicy) -> Self {
        self.config.unknown_parameter = policy;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<ConnectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
