//! Reads the latest ministry email from a local maildir.
//!
//! The bot only needs the raw body text and the header list of one message;
//! this module finds the most recent message whose subject matches a filter.

use mailparse::MailHeaderMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::CmBotError;

/// Subject of the weekly ministry email.
pub const DEFAULT_SUBJECT_FILTER: &str = "spiritual cyber-vitamin";

/// A single `name: value` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Headers and undecoded body of one email.
#[derive(Debug, Clone, Default)]
pub struct RawMessage {
    pub headers: Vec<Header>,
    pub text: String,
}

/// Something that can hand the bot the latest meeting email.
pub trait MailSource {
    fn latest_message(&self) -> Result<RawMessage, CmBotError>;
}

/// Mail source backed by a maildir (`new/` and `cur/`).
#[derive(Debug, Clone)]
pub struct MaildirSource {
    maildir: PathBuf,
    subject_filter: String,
}

impl MaildirSource {
    pub fn new(maildir: impl Into<PathBuf>, subject_filter: impl Into<String>) -> Self {
        Self {
            maildir: maildir.into(),
            subject_filter: subject_filter.into().to_lowercase(),
        }
    }

    fn list_files(&self) -> Result<Vec<PathBuf>, CmBotError> {
        let mut files = vec![];
        for sub in ["new", "cur"] {
            let dir = self.maildir.join(sub);
            if !dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }

    /// Reads a message, returning it with its timestamp if the subject matches.
    fn read_matching(&self, path: &Path) -> Result<Option<(i64, RawMessage)>, CmBotError> {
        let raw = fs::read(path)?;
        let (headers, body_offset) =
            mailparse::parse_headers(&raw).map_err(|e| CmBotError::Mail {
                message: format!("{}: {}", path.display(), e),
            })?;

        let subject = headers.get_first_value("Subject").unwrap_or_default();
        if !subject.to_lowercase().contains(&self.subject_filter) {
            return Ok(None);
        }

        let timestamp = headers
            .get_first_value("Date")
            .and_then(|d| mailparse::dateparse(&d).ok())
            .unwrap_or(i64::MIN);

        let message = RawMessage {
            headers: headers
                .iter()
                .map(|h| Header::new(h.get_key(), h.get_value()))
                .collect(),
            text: String::from_utf8_lossy(&raw[body_offset..]).into_owned(),
        };

        Ok(Some((timestamp, message)))
    }
}

impl MailSource for MaildirSource {
    fn latest_message(&self) -> Result<RawMessage, CmBotError> {
        let files = self.list_files()?;
        debug!(maildir = %self.maildir.display(), count = files.len(), "Scanning maildir");

        let mut latest: Option<(i64, RawMessage)> = None;
        for path in files {
            match self.read_matching(&path) {
                Ok(Some((timestamp, message))) => {
                    if latest.as_ref().map_or(true, |(t, _)| timestamp > *t) {
                        latest = Some((timestamp, message));
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable message"),
            }
        }

        let (_, message) = latest.ok_or_else(|| CmBotError::Mail {
            message: format!(
                "no message matching \"{}\" in {}",
                self.subject_filter,
                self.maildir.display()
            ),
        })?;

        info!(maildir = %self.maildir.display(), "Found latest meeting email");
        Ok(message)
    }
}
