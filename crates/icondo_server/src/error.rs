//! Controller error type and its HTTP mapping.
//!
//! # Invariants
//! - Every persistence failure maps to 500 except `NotFound` (404).
//! - Error bodies are always `{"error": "<message>"}`.

use crate::response::{self, HttpResponse};
use hyper::header::ALLOW;
use hyper::StatusCode;
use icondo_core::db::DbError;
use icondo_core::{ExportCsvError, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ControllerError {
    Db(DbError),
    Repo(RepoError),
    Export(ExportCsvError),
    Template(tera::Error),
    /// Body or path parameter could not be decoded.
    BadRequest(String),
    RouteNotFound(String),
    /// Known path, unsupported method. Carries the `Allow` header value.
    MethodNotAllowed(&'static str),
    /// Blocking worker panicked or was cancelled.
    Worker(String),
}

impl ControllerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(RepoError::NotFound(_)) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Db(_)
            | Self::Repo(_)
            | Self::Export(_)
            | Self::Template(_)
            | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let mut response = response::error(self.status(), &self.to_string());
        if let Self::MethodNotAllowed(allow) = self {
            response
                .headers_mut()
                .insert(ALLOW, hyper::header::HeaderValue::from_static(allow));
        }
        response
    }
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Template(err) => {
                // tera hides the useful part in the source chain.
                write!(f, "template error: {err}")?;
                let mut source = err.source();
                while let Some(inner) = source {
                    write!(f, ": {inner}")?;
                    source = inner.source();
                }
                Ok(())
            }
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::RouteNotFound(path) => write!(f, "no route for `{path}`"),
            Self::MethodNotAllowed(allow) => write!(f, "method not allowed; expected {allow}"),
            Self::Worker(message) => write!(f, "request worker failed: {message}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Template(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ControllerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportCsvError> for ControllerError {
    fn from(value: ExportCsvError) -> Self {
        Self::Export(value)
    }
}

impl From<tera::Error> for ControllerError {
    fn from(value: tera::Error) -> Self {
        Self::Template(value)
    }
}
