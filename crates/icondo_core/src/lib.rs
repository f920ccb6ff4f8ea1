//! Core domain logic for iCondo.
//! This crate is the single source of truth for condominium invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod view;

pub use export::csv::{render_csv, ExportError, CSV_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::condominium::{
    Condominium, CondominiumDraft, CondominiumId, CondominiumValidationError,
};
pub use repo::condominium_repo::{
    CondominiumRepository, RepoError, RepoResult, SqliteCondominiumRepository,
};
pub use search::filter::filter_by_razao_social;
pub use service::condominium_service::{CondominiumService, ExportCsvError};
pub use view::{CondoListView, ListDisplay, ListRow, EMPTY_LIST_MESSAGE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
