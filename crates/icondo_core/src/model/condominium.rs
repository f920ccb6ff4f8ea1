//! Condominium domain model.
//!
//! # Responsibility
//! - Define the persisted condominium record and its writable draft.
//! - Provide the single validation rule enforced before persistence.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by storage and never rewritten.
//! - `razao_social` must contain at least one non-whitespace character.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier of a condominium row.
pub type CondominiumId = i64;

/// Validation errors raised before a record reaches SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondominiumValidationError {
    /// `razao_social` is empty or whitespace-only.
    EmptyRazaoSocial,
}

impl Display for CondominiumValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRazaoSocial => write!(f, "razao_social cannot be empty"),
        }
    }
}

impl Error for CondominiumValidationError {}

/// Canonical condominium record as stored and served.
///
/// `created_at` is serialized as `createdAt` to match the dashboard payload.
/// Every field defaults on decode; a missing name is caught by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condominium {
    #[serde(default)]
    pub id: CondominiumId,
    #[serde(default)]
    pub razao_social: String,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub numend: Option<String>,
    #[serde(default)]
    pub complend: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    /// Unix epoch milliseconds.
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

impl Condominium {
    /// Validates the fields that storage refuses to accept.
    pub fn validate(&self) -> Result<(), CondominiumValidationError> {
        validate_razao_social(&self.razao_social)
    }

    /// Returns whether `razao_social` contains `needle_lower`.
    ///
    /// `needle_lower` must already be lower-cased by the caller so that a
    /// filter pass lower-cases the search text once.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.razao_social.to_lowercase().contains(needle_lower)
    }

    /// Blank optional strings become `None`, as on create.
    pub fn normalized(mut self) -> Self {
        clear_blank([
            &mut self.logradouro,
            &mut self.numend,
            &mut self.complend,
            &mut self.bairro,
            &mut self.cidade,
            &mut self.uf,
            &mut self.cep,
            &mut self.telefone,
            &mut self.cnpj,
            &mut self.localidade,
        ]);
        self
    }
}

/// Writable field set accepted by the create operation.
///
/// Carries exactly the ten fields a creation form submits; `id`,
/// `localidade` and `created_at` are filled in by storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondominiumDraft {
    #[serde(default)]
    pub razao_social: String,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub numend: Option<String>,
    #[serde(default)]
    pub complend: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
}

impl CondominiumDraft {
    /// Creates a draft with only the required name set.
    pub fn new(razao_social: impl Into<String>) -> Self {
        Self {
            razao_social: razao_social.into(),
            ..Self::default()
        }
    }

    /// Validates the fields that storage refuses to accept.
    pub fn validate(&self) -> Result<(), CondominiumValidationError> {
        validate_razao_social(&self.razao_social)
    }

    /// Derives the secondary display line from city and state.
    ///
    /// Returns `None` when neither component carries text.
    pub fn derived_localidade(&self) -> Option<String> {
        let cidade = non_blank(self.cidade.as_deref());
        let uf = non_blank(self.uf.as_deref());
        match (cidade, uf) {
            (Some(cidade), Some(uf)) => Some(format!("{cidade} - {uf}")),
            (Some(cidade), None) => Some(cidade.to_string()),
            (None, Some(uf)) => Some(uf.to_string()),
            (None, None) => None,
        }
    }

    /// Blank optional strings (as submitted by empty form inputs) become `None`.
    pub fn normalized(mut self) -> Self {
        clear_blank([
            &mut self.logradouro,
            &mut self.numend,
            &mut self.complend,
            &mut self.bairro,
            &mut self.cidade,
            &mut self.uf,
            &mut self.cep,
            &mut self.telefone,
            &mut self.cnpj,
        ]);
        self
    }

    /// Builds the full record an edit form describes for row `id`.
    ///
    /// `localidade` is re-derived from city and state; `created_at` is left
    /// at zero because storage never rewrites it.
    pub fn into_condominium(self, id: CondominiumId) -> Condominium {
        let localidade = self.derived_localidade();
        Condominium {
            id,
            razao_social: self.razao_social,
            logradouro: self.logradouro,
            numend: self.numend,
            complend: self.complend,
            bairro: self.bairro,
            cidade: self.cidade,
            uf: self.uf,
            cep: self.cep,
            telefone: self.telefone,
            cnpj: self.cnpj,
            localidade,
            created_at: 0,
        }
    }
}

impl From<&Condominium> for CondominiumDraft {
    fn from(value: &Condominium) -> Self {
        Self {
            razao_social: value.razao_social.clone(),
            logradouro: value.logradouro.clone(),
            numend: value.numend.clone(),
            complend: value.complend.clone(),
            bairro: value.bairro.clone(),
            cidade: value.cidade.clone(),
            uf: value.uf.clone(),
            cep: value.cep.clone(),
            telefone: value.telefone.clone(),
            cnpj: value.cnpj.clone(),
        }
    }
}

fn validate_razao_social(value: &str) -> Result<(), CondominiumValidationError> {
    if value.trim().is_empty() {
        return Err(CondominiumValidationError::EmptyRazaoSocial);
    }
    Ok(())
}

fn clear_blank<const N: usize>(fields: [&mut Option<String>; N]) {
    for field in fields {
        if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
            *field = None;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
