//! SQLite storage for the condominium registry.
//!
//! # Responsibility
//! - Open the database file the server was pointed at and bring its schema
//!   up to date.
//! - Report failures with enough context (file path, migration version) for
//!   a 500 body or a CLI error line to be actionable.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No repository touches a connection before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Statement-level failure on an already usable connection.
    Sqlite(rusqlite::Error),
    /// The database file could not be opened or configured.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// A schema migration failed; the transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Attaches the database path to a bare SQLite failure.
    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Sqlite(source) => Self::Open {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Open { path, source } => {
                write!(f, "cannot open database `{}`: {source}", path.display())
            }
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(source) | Self::Open { source, .. } | Self::Migration { source, .. } => {
                Some(source)
            }
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
