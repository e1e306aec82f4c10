use crate::checks::Check;
use crate::config::Config;
use crate::error::CheckError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Fails unless a GET to every configured URL answers with the expected
/// status code within the timeout.
pub struct UrlCheck {
    timeout: Duration,
    expected_status: u16,
    urls: Vec<String>,
}

impl UrlCheck {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.checks.url_check.timeout),
            expected_status: config.checks.url_check.expected_status,
            urls: config.checks.url_check.urls.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.urls.is_empty()
    }
}

#[async_trait]
impl Check for UrlCheck {
    async fn check(&self) -> Result<(), CheckError> {
        debug!("Running URL checks");

        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        for url in &self.urls {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| format!("Failed to access {}: {}", url, e))?;
            if response.status().as_u16() != self.expected_status {
                return Err(
                    format!("URL {} returned status {}", url, response.status()).into(),
                );
            }
        }
        Ok(())
    }
}
