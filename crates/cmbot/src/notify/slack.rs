//! Slack incoming-webhook posts.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{check_response, ChatService};
use crate::error::CmBotError;

pub struct SlackClient {
    client: Client,
    webhook_url: String,
}

impl SlackClient {
    pub fn new(client: Client, webhook_url: &str) -> Self {
        Self {
            client,
            webhook_url: webhook_url.to_string(),
        }
    }
}

/// Form body Slack webhooks accept: `payload={"text": ...}`.
fn webhook_payload(message: &str) -> String {
    json!({ "text": message }).to_string()
}

#[async_trait]
impl ChatService for SlackClient {
    fn name(&self) -> &'static str {
        "Slack"
    }

    async fn post(&self, message: &str) -> Result<(), CmBotError> {
        debug!("Posting to Slack");
        let payload = webhook_payload(message);
        let result = self
            .client
            .post(&self.webhook_url)
            .form(&[("payload", payload.as_str())])
            .send()
            .await;
        check_response(self.name(), result).await
    }
}
