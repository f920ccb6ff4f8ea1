//! Condominium use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for server and CLI callers.
//! - Return the confirmed collection after each mutation so clients can
//!   replace their local copy wholesale.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::export::csv::{render_csv, ExportError};
use crate::model::condominium::{Condominium, CondominiumDraft, CondominiumId};
use crate::repo::condominium_repo::{CondominiumRepository, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Use-case service wrapper for condominium CRUD operations.
pub struct CondominiumService<R: CondominiumRepository> {
    repo: R,
}

impl<R: CondominiumRepository> CondominiumService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every record in storage order.
    pub fn list_condominiums(&self) -> RepoResult<Vec<Condominium>> {
        self.repo.list_condominiums()
    }

    pub fn get_condominium(&self, id: CondominiumId) -> RepoResult<Option<Condominium>> {
        self.repo.get_condominium(id)
    }

    /// Persists a draft and returns the stored record.
    ///
    /// Blank optional inputs are stored as `NULL`.
    pub fn create_condominium(&self, draft: CondominiumDraft) -> RepoResult<Condominium> {
        self.repo.create_condominium(&draft.normalized())
    }

    /// Creates a record and returns the confirmed collection.
    pub fn create_and_list(&self, draft: CondominiumDraft) -> RepoResult<Vec<Condominium>> {
        self.create_condominium(draft)?;
        self.repo.list_condominiums()
    }

    /// Replaces an existing record and returns the confirmed collection.
    ///
    /// Blank optional inputs are stored as `NULL`, as on create. `created_at`
    /// in the input is ignored; storage keeps the original.
    pub fn update_and_list(&self, condominium: &Condominium) -> RepoResult<Vec<Condominium>> {
        self.repo
            .update_condominium(&condominium.clone().normalized())?;
        self.repo.list_condominiums()
    }

    /// Deletes a record and returns the confirmed collection.
    pub fn delete_and_list(&self, id: CondominiumId) -> RepoResult<Vec<Condominium>> {
        self.repo.delete_condominium(id)?;
        self.repo.list_condominiums()
    }

    /// Renders the whole collection as CSV bytes.
    pub fn export_csv(&self) -> Result<Vec<u8>, ExportCsvError> {
        let condominiums = self.repo.list_condominiums()?;
        Ok(render_csv(&condominiums)?)
    }
}

/// Failure of the CSV export use-case.
#[derive(Debug)]
pub enum ExportCsvError {
    /// Reading the collection failed.
    Repo(RepoError),
    /// Encoding the collection failed.
    Export(ExportError),
}

impl Display for ExportCsvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportCsvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExportCsvError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ExportCsvError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
