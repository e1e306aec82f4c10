//! HTTP client that queries the health routes of a running server.

use crate::config::CONFIG;
use crate::handler::{DOWN_PATH, STATUS_PATH, UP_PATH};
use crate::status::HealthStatus;

use log::debug;
use reqwest::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Server error: {0} - {1}")]
    ServerError(reqwest::StatusCode, String),
}

/// Retrieve the health status from the server. An unhealthy server answers
/// with a 503 but still sends the status, so both codes are accepted.
pub async fn get_status() -> Result<HealthStatus, ClientError> {
    debug!("GET {}", STATUS_PATH);
    let response = Client::new().get(get_url(STATUS_PATH)).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::SERVICE_UNAVAILABLE {
        return Err(ClientError::ServerError(status, body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Marks the server up or down through its manual check.
pub async fn set_manual_status(up: bool) -> Result<(), ClientError> {
    post(if up { UP_PATH } else { DOWN_PATH }).await
}

/// Send a POST request without a body to the server.
async fn post(uri: &str) -> Result<(), ClientError> {
    debug!("POST {}", uri);
    let response = Client::new().post(get_url(uri)).send().await?;
    if response.status().is_success() {
        Ok(())
    } else {
        let status = response.status();
        let body = response.text().await?;
        Err(ClientError::ServerError(status, body))
    }
}

/// Generate the endpoint URL from the given URI.
fn get_url(uri: &str) -> String {
    format!("{}{}", &CONFIG.server, uri)
}
