use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::{debug, warn};

use crate::gtfs;

mod import;
mod schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Gtfs error: {0}")]
    Gtfs(#[from] gtfs::Error),
    #[error("Schedule store not found at {0}")]
    NotFound(PathBuf),
}

/// Location of the embedded schedule database.
///
/// A `Store` holds no connection. Readers call [`Store::connect`] for each
/// request and drop the connection when they are done, so any number of
/// readers can work concurrently.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens an existing store. The file must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, self::Error> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(self::Error::NotFound(path));
        }
        Ok(Self { path })
    }

    /// Creates the schema, keeping any data already present. A store written
    /// with an older schema is emptied and has to be imported again.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, self::Error> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version != schema::SCHEMA_VERSION {
            if version != 0 {
                warn!(
                    "Schedule store at {} has schema version {version}, rebuilding it empty",
                    path.display()
                );
            }
            for table in schema::TABLES {
                conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
            }
        }
        conn.execute_batch(schema::SCHEMA)?;
        conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        debug!("Schedule store ready at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only connection for a single request.
    pub fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        // Readers wait out an import commit instead of failing.
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    pub(crate) fn connect_writable(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}
