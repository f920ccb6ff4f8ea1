//! Terminal collaborators for the condominium list view.
//!
//! # Responsibility
//! - Talk to a running iCondo server over HTTP (`HttpFetchAdapter`).
//! - Save downloads into a directory and print notifications to stderr.
//!
//! # Invariants
//! - Adapters never panic; transport failures surface as `FetchError`.

use icondo_core::view::{
    Downloader, FetchAdapter, FetchError, FetchMethod, FetchRequest, FetchResponse, Notification,
    Notifier,
};
use icondo_core::ListDisplay;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Blocking HTTP adapter rooted at the server base URL.
#[derive(Debug, Clone)]
pub struct HttpFetchAdapter {
    client: Client,
    base_url: Url,
}

impl HttpFetchAdapter {
    /// Builds an adapter for `base_url`. A missing trailing slash is added so
    /// relative API paths join under it.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| FetchError::Transport(format!("invalid base url `{base_url}`: {err}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl FetchAdapter for HttpFetchAdapter {
    fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        debug!(
            "event=fetch module=cli status=start method={} url={url}",
            request.method.as_str()
        );

        let builder = match request.method {
            FetchMethod::Get => self.client.get(url),
            FetchMethod::Post => self.client.post(url),
            FetchMethod::Put => self.client.put(url),
            FetchMethod::Delete => self.client.delete(url),
        };
        let builder = match request.body {
            Some(body) => builder.header(CONTENT_TYPE, "application/json").body(body),
            None => builder,
        };

        let response = builder
            .send()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let data = response
            .bytes()
            .map_err(|err| FetchError::Transport(err.to_string()))?
            .to_vec();
        Ok(FetchResponse { status, data })
    }
}

/// Writes downloads into a fixed directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn save(&self, file_name: &str, data: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(file_name), data)
    }
}

/// Prints notifications as `title: description` lines on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.description {
            Some(description) => eprintln!("{}: {description}", notification.title),
            None => eprintln!("{}", notification.title),
        }
    }
}

/// Formats the list view output as tab-separated lines.
pub fn format_display(display: &ListDisplay, empty_message: &str) -> Vec<String> {
    match display {
        ListDisplay::Loading => Vec::new(),
        ListDisplay::Empty => vec![empty_message.to_string()],
        ListDisplay::Rows(rows) => rows
            .iter()
            .map(|row| {
                let id = row.id.to_string();
                [
                    id.as_str(),
                    row.name.as_str(),
                    row.locality.as_str(),
                    row.street.as_str(),
                    row.neighborhood.as_str(),
                    row.postal_code.as_str(),
                    row.phone.as_str(),
                    row.created.as_str(),
                ]
                .join("\t")
            })
            .collect(),
    }
}
