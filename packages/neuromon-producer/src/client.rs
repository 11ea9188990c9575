//! HTTP client for the backend ingestion endpoint.

use std::time::Duration;
use thiserror::Error;

use crate::payload::{EegStreamPayload, StreamResponse};

/// Per-request timeout on the ingestion path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
/// Delay between startup connection attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend unreachable after {attempts} attempts")]
    BackendUnreachable { attempts: u32 },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend rejected record: {status}")]
    Rejected { status: reqwest::StatusCode },
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Probe the backend health endpoint, retrying with a fixed delay.
    /// Fails only after the final retry.
    pub async fn wait_until_ready(&self, max_attempts: u32) -> Result<(), ClientError> {
        let url = format!("{}/health", self.base_url);
        for attempt in 1..=max_attempts {
            match self.http.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    log::info!("Backend ready at {}", self.base_url);
                    return Ok(());
                }
                Ok(response) => {
                    log::warn!(
                        "Backend health check attempt {}/{} returned {}",
                        attempt,
                        max_attempts,
                        response.status()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "Backend health check attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        e
                    );
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
        Err(ClientError::BackendUnreachable {
            attempts: max_attempts,
        })
    }

    /// Post one record to the ingestion endpoint.
    pub async fn post_stream(
        &self,
        payload: &EegStreamPayload,
    ) -> Result<StreamResponse, ClientError> {
        let url = format!("{}/eeg/stream", self.base_url);
        let response = self.http.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Rejected {
                status: response.status(),
            });
        }
        Ok(response.json::<StreamResponse>().await?)
    }
}
