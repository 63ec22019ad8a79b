//! Configuration for the bot: storage, mail source and chat services
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::CmBotError;
use crate::mail::DEFAULT_SUBJECT_FILTER;

/// Top-level configuration, read from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub groupme: Option<GroupMeConfig>,
    #[serde(default)]
    pub slack: Option<SlackConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Maildir the ministry email is delivered to
    #[serde(default = "default_maildir")]
    pub maildir: PathBuf,
    /// Case-insensitive substring of the email's subject
    #[serde(default = "default_subject_filter")]
    pub subject_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMeConfig {
    pub bot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming webhook URL
    pub webhook_url: String,
}

/// Bind address of the GroupMe callback relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_address")]
    pub address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("cmbot.sqlite3")
}

fn default_maildir() -> PathBuf {
    PathBuf::from("Maildir")
}

fn default_subject_filter() -> String {
    DEFAULT_SUBJECT_FILTER.to_string()
}

fn default_server_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5001
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            maildir: default_maildir(),
            subject_filter: default_subject_filter(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
            port: default_server_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            mail: MailConfig::default(),
            groupme: None,
            slack: None,
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates the config file
    ///
    /// # Arguments
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    /// * `Ok(Config)` - The parsed configuration
    /// * `Err(CmBotError::Config)` - If the file can't be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, CmBotError> {
        let content = fs::read_to_string(path).map_err(|e| CmBotError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CmBotError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CmBotError> {
        if let Some(groupme) = &self.groupme {
            if groupme.bot_id.trim().is_empty() {
                return Err(CmBotError::Config {
                    message: "groupme.bot_id is empty".to_string(),
                });
            }
        }
        if let Some(slack) = &self.slack {
            let url = Url::parse(&slack.webhook_url).map_err(|e| CmBotError::Config {
                message: format!("slack.webhook_url: {e}"),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(CmBotError::Config {
                    message: format!("slack.webhook_url: unsupported scheme {}", url.scheme()),
                });
            }
        }
        Ok(())
    }

    /// Address the relay server binds to
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}
