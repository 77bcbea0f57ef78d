//! Store configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for opening the engine store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use catlodge::store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/catlodge.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert!(!config.read_only);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the store in read-only mode.
    pub read_only: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with default settings
    /// (5s busy timeout, auto-create on, read-write).
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Opens the store in read-only mode. Disables auto-create.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}
