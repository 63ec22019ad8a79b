//! Finds the weekly CM meeting room in the ministry email and announces it.
//!
//! Module structure:
//! - `extract` - Email normalization, banner matching and date resolution
//! - `gate` - Whether today's run should look for a meeting
//! - `db` - Current location per meeting type (SQLite)
//! - `compose` - Announcement and fallback sentences
//! - `mail` / `notify` - Maildir source and GroupMe/Slack posting
//! - `bot` - One find-and-announce run
//! - `server` - GroupMe callback relay to Slack

pub mod bot;
pub mod compose;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod gate;
pub mod mail;
pub mod notify;
pub mod server;
pub mod types;

pub use bot::{CmBot, RunOptions, RunOutcome};
pub use config::Config;
pub use error::CmBotError;
pub use types::{Location, MeetingType};
