//! Condominium repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `condominiums` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is insertion order (`id ASC`).

use crate::db::DbError;
use crate::model::condominium::{
    Condominium, CondominiumDraft, CondominiumId, CondominiumValidationError,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONDOMINIUM_SELECT_SQL: &str = "SELECT
    id,
    razao_social,
    logradouro,
    numend,
    complend,
    bairro,
    cidade,
    uf,
    cep,
    telefone,
    cnpj,
    localidade,
    created_at
FROM condominiums";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for condominium persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(CondominiumValidationError),
    Db(DbError),
    NotFound(CondominiumId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "condominium not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted condominium data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CondominiumValidationError> for RepoError {
    fn from(value: CondominiumValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for condominium CRUD operations.
pub trait CondominiumRepository {
    /// Inserts a draft and returns the stored record with assigned
    /// `id`/`created_at`.
    fn create_condominium(&self, draft: &CondominiumDraft) -> RepoResult<Condominium>;
    /// Replaces every writable field of an existing record.
    fn update_condominium(&self, condominium: &Condominium) -> RepoResult<()>;
    fn get_condominium(&self, id: CondominiumId) -> RepoResult<Option<Condominium>>;
    fn list_condominiums(&self) -> RepoResult<Vec<Condominium>>;
    fn delete_condominium(&self, id: CondominiumId) -> RepoResult<()>;
}

/// SQLite-backed condominium repository.
pub struct SqliteCondominiumRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCondominiumRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CondominiumRepository for SqliteCondominiumRepository<'_> {
    fn create_condominium(&self, draft: &CondominiumDraft) -> RepoResult<Condominium> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO condominiums (
                razao_social,
                logradouro,
                numend,
                complend,
                bairro,
                cidade,
                uf,
                cep,
                telefone,
                cnpj,
                localidade
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                draft.razao_social.as_str(),
                draft.logradouro.as_deref(),
                draft.numend.as_deref(),
                draft.complend.as_deref(),
                draft.bairro.as_deref(),
                draft.cidade.as_deref(),
                draft.uf.as_deref(),
                draft.cep.as_deref(),
                draft.telefone.as_deref(),
                draft.cnpj.as_deref(),
                draft.derived_localidade(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("event=condominium_create module=repo status=ok id={id}");

        self.get_condominium(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("row {id} vanished right after insert"))
        })
    }

    fn update_condominium(&self, condominium: &Condominium) -> RepoResult<()> {
        condominium.validate()?;

        let changed = self.conn.execute(
            "UPDATE condominiums
             SET
                razao_social = ?1,
                logradouro = ?2,
                numend = ?3,
                complend = ?4,
                bairro = ?5,
                cidade = ?6,
                uf = ?7,
                cep = ?8,
                telefone = ?9,
                cnpj = ?10,
                localidade = ?11,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE id = ?12;",
            params![
                condominium.razao_social.as_str(),
                condominium.logradouro.as_deref(),
                condominium.numend.as_deref(),
                condominium.complend.as_deref(),
                condominium.bairro.as_deref(),
                condominium.cidade.as_deref(),
                condominium.uf.as_deref(),
                condominium.cep.as_deref(),
                condominium.telefone.as_deref(),
                condominium.cnpj.as_deref(),
                condominium.localidade.as_deref(),
                condominium.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(condominium.id));
        }

        info!(
            "event=condominium_update module=repo status=ok id={}",
            condominium.id
        );
        Ok(())
    }

    fn get_condominium(&self, id: CondominiumId) -> RepoResult<Option<Condominium>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONDOMINIUM_SELECT_SQL} WHERE id = ?1;"))?;

        let row = stmt.query_row([id], |row| Ok(read_row(row))).optional()?;
        match row {
            Some(parsed) => Ok(Some(parsed?)),
            None => Ok(None),
        }
    }

    fn list_condominiums(&self) -> RepoResult<Vec<Condominium>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONDOMINIUM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut condominiums = Vec::new();

        while let Some(row) = rows.next()? {
            condominiums.push(read_row(row)?);
        }

        Ok(condominiums)
    }

    fn delete_condominium(&self, id: CondominiumId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM condominiums WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=condominium_delete module=repo status=ok id={id}");
        Ok(())
    }
}

fn read_row(row: &Row<'_>) -> RepoResult<Condominium> {
    let condominium = Condominium {
        id: row.get("id")?,
        razao_social: row.get("razao_social")?,
        logradouro: row.get("logradouro")?,
        numend: row.get("numend")?,
        complend: row.get("complend")?,
        bairro: row.get("bairro")?,
        cidade: row.get("cidade")?,
        uf: row.get("uf")?,
        cep: row.get("cep")?,
        telefone: row.get("telefone")?,
        cnpj: row.get("cnpj")?,
        localidade: row.get("localidade")?,
        created_at: row.get("created_at")?,
    };

    condominium.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "row {} in condominiums: {err}",
            condominium.id
        ))
    })?;
    Ok(condominium)
}
