//! Store connection management.
//!
//! Opens the `SQLite` store with WAL journaling, a busy timeout, and a
//! schema-version compatibility check. Multiple workers may hold their own
//! connection to the same store file; mutations run under immediate
//! transactions (and the engine's category lock, see
//! [`crate::operations::CategoryLocks`]).

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

use super::config::StoreConfig;

/// A store connection wrapper with configuration.
///
/// # Examples
///
/// ```no_run
/// use catlodge::store::{Store, StoreConfig};
///
/// let config = StoreConfig::new("/tmp/catlodge.db");
/// let store = Store::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Store {
    pub(super) conn: Connection,
    #[allow(dead_code)]
    config: StoreConfig,
}

impl Store {
    /// Opens a store with the given configuration.
    ///
    /// Creates the parent directory when auto-create is enabled, switches
    /// the journal to WAL mode for concurrent readers, applies the busy
    /// timeout, and initializes or verifies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, PRAGMA settings
    /// cannot be applied, or the schema version is incompatible.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // PRAGMA journal_mode returns a row, so query it rather than execute.
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        super::migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying connection, for
    /// operations that need transactions.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
