use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::server::types::ApiErrorType;
use crate::server::RelayState;

/// The fields of a GroupMe bot callback the relay cares about.
#[derive(Debug, Deserialize)]
pub struct GroupMeCallback {
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl GroupMeCallback {
    /// Line forwarded to Slack, e.g. "Jane - see you tonight".
    pub fn relay_text(&self) -> String {
        format!("{} - {}", self.name, self.text.as_deref().unwrap_or_default())
    }
}

/// POST /
/// Forwards a GroupMe group message to Slack
pub async fn post_callback(
    State(s): State<Arc<RelayState>>,
    Json(callback): Json<GroupMeCallback>,
) -> Response {
    info!(name = %callback.name, "POST / (GroupMe callback)");

    let Some(slack) = &s.slack else {
        warn!("Received a callback but Slack is not configured");
        return ApiErrorType::from((
            StatusCode::BAD_GATEWAY,
            "Slack is not configured",
            None,
        ))
        .into_response();
    };

    match slack.post(&callback.relay_text()).await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::BAD_GATEWAY,
            "Failed to relay message",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

/// GET /health
pub async fn get_health() -> Response {
    (StatusCode::OK, "OK").into_response()
}
