//! CSV rendering of the condominium collection.
//!
//! # Invariants
//! - The header row is always written, even for an empty collection.
//! - Column order is fixed by `CSV_HEADER`.
//! - Missing optional fields become empty cells.

use crate::model::condominium::Condominium;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// File name offered to the browser/CLI for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "condominios.csv";

/// MIME type of the rendered payload.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const CSV_HEADER: [&str; 13] = [
    "id",
    "razao_social",
    "logradouro",
    "numend",
    "complend",
    "bairro",
    "cidade",
    "uf",
    "cep",
    "telefone",
    "cnpj",
    "localidade",
    "createdAt",
];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Csv(::csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv encoding failed: {err}"),
            Self::Io(err) => write!(f, "csv buffer flush failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<::csv::Error> for ExportError {
    fn from(value: ::csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    razao_social: &'a str,
    logradouro: Option<&'a str>,
    numend: Option<&'a str>,
    complend: Option<&'a str>,
    bairro: Option<&'a str>,
    cidade: Option<&'a str>,
    uf: Option<&'a str>,
    cep: Option<&'a str>,
    telefone: Option<&'a str>,
    cnpj: Option<&'a str>,
    localidade: Option<&'a str>,
    created_at: String,
}

impl<'a> From<&'a Condominium> for CsvRow<'a> {
    fn from(value: &'a Condominium) -> Self {
        Self {
            id: value.id,
            razao_social: value.razao_social.as_str(),
            logradouro: value.logradouro.as_deref(),
            numend: value.numend.as_deref(),
            complend: value.complend.as_deref(),
            bairro: value.bairro.as_deref(),
            cidade: value.cidade.as_deref(),
            uf: value.uf.as_deref(),
            cep: value.cep.as_deref(),
            telefone: value.telefone.as_deref(),
            cnpj: value.cnpj.as_deref(),
            localidade: value.localidade.as_deref(),
            created_at: format_created_at(value.created_at),
        }
    }
}

/// Renders records in the given order as UTF-8 CSV bytes.
pub fn render_csv(condominiums: &[Condominium]) -> ExportResult<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for condominium in condominiums {
        writer.serialize(CsvRow::from(condominium))?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

/// RFC 3339 in UTC; out-of-range timestamps fall back to the raw number.
fn format_created_at(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| epoch_ms.to_string())
}
