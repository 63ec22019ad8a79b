//! GroupMe bot posts.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{check_response, ChatService};
use crate::error::CmBotError;

const GROUPME_POST_URL: &str = "https://api.groupme.com/v3/bots/post";

pub struct GroupMeClient {
    client: Client,
    bot_id: String,
    url: String,
}

impl GroupMeClient {
    pub fn new(client: Client, bot_id: &str) -> Self {
        Self::with_url(client, bot_id, GROUPME_POST_URL)
    }

    /// Posts to a different endpoint, e.g. a local stub.
    pub fn with_url(client: Client, bot_id: &str, url: &str) -> Self {
        Self {
            client,
            bot_id: bot_id.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl ChatService for GroupMeClient {
    fn name(&self) -> &'static str {
        "GroupMe"
    }

    async fn post(&self, message: &str) -> Result<(), CmBotError> {
        debug!(url = %self.url, "Posting to GroupMe");
        let result = self
            .client
            .post(&self.url)
            .form(&[("bot_id", self.bot_id.as_str()), ("text", message)])
            .send()
            .await;
        check_response(self.name(), result).await
    }
}
