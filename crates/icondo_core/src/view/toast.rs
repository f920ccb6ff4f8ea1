//! Notification and download seams.

use std::io;

/// User-facing message with a title and optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

/// Shows notifications to the user.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Materializes a downloaded payload under a file name.
pub trait Downloader {
    fn save(&self, file_name: &str, data: &[u8]) -> io::Result<()>;
}
