//! Transport seam between the list view and the server API.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// API path of the collection endpoint, relative to the adapter base URL.
pub const CONDOS_PATH: &str = "condos";
/// API path of the CSV export endpoint.
pub const EXPORT_CSV_PATH: &str = "condos/export-csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl FetchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One request issued by the view. `body` is JSON when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: FetchMethod,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl FetchRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: FetchMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_json(method: FetchMethod, path: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Raw response: status code and undecoded body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub data: Vec<u8>,
}

/// Client-side failure of a round-trip.
#[derive(Debug)]
pub enum FetchError {
    /// Request never produced a response (connection refused, DNS, ...).
    Transport(String),
    /// Response arrived with an unexpected status.
    Status(u16),
    /// Response body could not be decoded.
    Decode(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Status(status) => write!(f, "unexpected response status {status}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl Error for FetchError {}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Issues requests against the condominium API.
///
/// Implementations must not panic; every failure to obtain a response maps to
/// `FetchError::Transport`.
pub trait FetchAdapter {
    fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

impl<T: FetchAdapter + ?Sized> FetchAdapter for &T {
    fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        (**self).fetch(request)
    }
}
