//! HTTP client for an external gamification provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::errors::{ConfigError, FetchError};
use crate::models::snapshot::GamificationSnapshot;
use crate::models::wire::{ProfilePayload, SessionPayload};
use crate::provider::{SnapshotProvider, SnapshotScope};

/// Talks to `GET {base}/user/{id}/gamification` and `GET {base}/user/gamification`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: Url,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidProviderUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidProviderUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Build the endpoint URL for a scope; ids are percent-encoded as a
    /// single path segment.
    pub fn endpoint(&self, scope: &SnapshotScope) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::Network(format!("{} cannot be a base", self.base_url)))?;
            segments.pop_if_empty();
            match scope {
                SnapshotScope::User(id) => {
                    segments.extend(["user", id.as_str(), "gamification"]);
                }
                SnapshotScope::Session => {
                    segments.extend(["user", "gamification"]);
                }
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SnapshotProvider for HttpProvider {
    async fn get_snapshot(&self, scope: &SnapshotScope) -> Result<GamificationSnapshot, FetchError> {
        let url = self.endpoint(scope)?;
        tracing::debug!(url = %url, "Fetching gamification snapshot");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Provider request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies carry no contract; only the status matters.
            tracing::warn!(url = %url, status = status.as_u16(), "Provider returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        match scope {
            SnapshotScope::User(id) => {
                let payload: ProfilePayload = response
                    .json()
                    .await
                    .map_err(|e| FetchError::Decode(e.to_string()))?;
                payload.into_snapshot(id)
            }
            SnapshotScope::Session => {
                let payload: SessionPayload = response
                    .json()
                    .await
                    .map_err(|e| FetchError::Decode(e.to_string()))?;
                payload.into_snapshot()
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
