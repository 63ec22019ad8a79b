//! Error types for the meeting bot.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::MeetingType;

/// Errors and early-exit outcomes of a bot run.
#[derive(Debug, Error)]
pub enum CmBotError {
    /// The meeting banner was not found in the email
    #[error("No meeting location found in email")]
    LocationNotFound,

    /// The email has no `Date` header
    #[error("No Date header found in email")]
    NoDateHeader,

    /// The `Date` header could not be read as a date
    #[error("Could not parse Date header: {value}")]
    MalformedDateHeader { value: String },

    /// The email announces a meeting on a different day
    #[error("No {meeting_type} meeting today (email is for {resolved}, today is {today})")]
    StaleMeetingDate {
        meeting_type: MeetingType,
        resolved: NaiveDate,
        today: NaiveDate,
    },

    /// A notification for today's meeting already went out
    #[error("Message already sent")]
    AlreadySent,

    /// Today is not the meeting's weekday
    #[error("No {meeting_type} meeting today")]
    NotScheduledDay { meeting_type: MeetingType },

    /// A chat service rejected or failed to receive the message
    #[error("Failed to post to {service}: {message}")]
    Delivery { service: String, message: String },

    /// Tried to mark a location as sent before one was saved
    #[error("No saved location for {meeting_type}")]
    NoRecord { meeting_type: MeetingType },

    /// The location store failed
    #[error("Database error: {message}")]
    Database { message: String },

    /// The mail source failed or had no matching message
    #[error("Mail error: {message}")]
    Mail { message: String },

    /// The config file is missing or invalid
    #[error("Config error: {message}")]
    Config { message: String },
}

impl CmBotError {
    /// Returns true for gate outcomes that mean there is nothing to do today.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            CmBotError::AlreadySent | CmBotError::NotScheduledDay { .. }
        )
    }

    /// Returns true for extraction failures that fall back to the last known location.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            CmBotError::LocationNotFound
                | CmBotError::NoDateHeader
                | CmBotError::MalformedDateHeader { .. }
                | CmBotError::StaleMeetingDate { .. }
        )
    }
}

impl From<rusqlite::Error> for CmBotError {
    fn from(err: rusqlite::Error) -> Self {
        CmBotError::Database {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CmBotError {
    fn from(err: std::io::Error) -> Self {
        CmBotError::Mail {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CmBotError {
    fn from(err: serde_json::Error) -> Self {
        CmBotError::Config {
            message: err.to_string(),
        }
    }
}
