//! Chat services the bot announces meetings on.

mod groupme;
mod slack;

pub use groupme::GroupMeClient;
pub use slack::SlackClient;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

use crate::config::Config;
use crate::error::CmBotError;

/// A chat service that can receive a plain text message.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Posts `message`. Any non-2xx answer is a `CmBotError::Delivery`.
    async fn post(&self, message: &str) -> Result<(), CmBotError>;
}

/// Builds the shared HTTP client for chat posts.
pub fn http_client() -> Result<Client, CmBotError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| CmBotError::Config {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Creates a client for every chat service present in the config.
pub fn services_from_config(
    config: &Config,
    client: &Client,
) -> Vec<Box<dyn ChatService>> {
    let mut services: Vec<Box<dyn ChatService>> = Vec::new();
    if let Some(groupme) = &config.groupme {
        services.push(Box::new(GroupMeClient::new(client.clone(), &groupme.bot_id)));
    }
    if let Some(slack) = &config.slack {
        services.push(Box::new(SlackClient::new(client.clone(), &slack.webhook_url)));
    }
    services
}

/// Posts `message` to each service in turn, stopping at the first failure.
pub async fn deliver(services: &[Box<dyn ChatService>], message: &str) -> Result<(), CmBotError> {
    if services.is_empty() {
        return Err(CmBotError::Delivery {
            service: "none".to_string(),
            message: "no chat service configured".to_string(),
        });
    }

    for service in services {
        if let Err(e) = service.post(message).await {
            error!(service = service.name(), error = %e, "Delivery failed");
            return Err(e);
        }
        info!(service = service.name(), "Message posted");
    }
    Ok(())
}

/// Maps a failed request or a non-2xx answer to a delivery error.
pub(crate) async fn check_response(
    service: &str,
    result: Result<reqwest::Response, reqwest::Error>,
) -> Result<(), CmBotError> {
    let response = result.map_err(|e| CmBotError::Delivery {
        service: service.to_string(),
        message: e.to_string(),
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(CmBotError::Delivery {
            service: service.to_string(),
            message: format!("status {}: {}", status, body),
        });
    }
    Ok(())
}
