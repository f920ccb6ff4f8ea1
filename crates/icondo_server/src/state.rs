//! Shared, immutable server state.
//!
//! # Invariants
//! - No mutable state is shared between requests; each request opens its own
//!   SQLite connection on a blocking worker.

use crate::error::ControllerError;
use crate::templates::load_templates;
use icondo_core::db::open_db;
use icondo_core::{CondominiumService, SqliteCondominiumRepository};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::Tera;

/// Service type handed to request jobs.
pub type RequestService<'conn> = CondominiumService<SqliteCondominiumRepository<'conn>>;

#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    templates: Arc<Tera>,
}

impl AppState {
    /// Migrates the database at `db_path` and compiles templates.
    ///
    /// Fails fast so a misconfigured server never starts listening.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, ControllerError> {
        let db_path = db_path.into();
        drop(open_db(&db_path)?);
        let templates = load_templates()?;
        info!(
            "event=app_state_ready module=server status=ok db_path={}",
            db_path.display()
        );
        Ok(Self {
            db_path: Arc::new(db_path),
            templates: Arc::new(templates),
        })
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn templates(&self) -> &Tera {
        &self.templates
    }

    /// Runs `job` against a fresh connection on the blocking pool.
    pub async fn with_service<T, F>(&self, job: F) -> Result<T, ControllerError>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&RequestService<'conn>) -> Result<T, ControllerError>
            + Send
            + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || -> Result<T, ControllerError> {
            let conn = open_db(db_path.as_path())?;
            let service = CondominiumService::new(SqliteCondominiumRepository::new(&conn));
            job(&service)
        })
        .await
        .map_err(|err| ControllerError::Worker(err.to_string()))?
    }
}
