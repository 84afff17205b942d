//! Gamification data provider contract and its implementations.
//!
//! View models only see [`SnapshotProvider`]; whether the data comes from
//! the in-process stub or an external HTTP service is decided at startup.

pub mod http;
pub mod stub;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::errors::{ConfigError, FetchError};
use crate::models::snapshot::{GamificationSnapshot, UserId};

pub use http::HttpProvider;
pub use stub::StubProvider;

/// Whose snapshot to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotScope {
    /// A specific user, as requested by the profile view.
    User(UserId),
    /// The caller's own session, as requested by the dashboard.
    Session,
}

/// Read-only source of gamification snapshots.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch a fully populated snapshot. No partial results.
    async fn get_snapshot(&self, scope: &SnapshotScope) -> Result<GamificationSnapshot, FetchError>;

    /// Short name used in logs and readiness output.
    fn name(&self) -> &'static str;
}

/// Select the provider named by the configuration.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn SnapshotProvider>, ConfigError> {
    match &config.provider_url {
        Some(url) => {
            let provider = HttpProvider::new(url, config.provider_timeout())?;
            tracing::info!(provider_url = %url, "Using HTTP gamification provider");
            Ok(Arc::new(provider))
        }
        None => {
            tracing::info!(latency_ms = config.stub_latency_ms, "Using stub gamification provider");
            Ok(Arc::new(StubProvider::with_latency(config.stub_latency())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_stub() {
        let provider = from_config(&AppConfig::default()).unwrap();
        assert_eq!(provider.name(), "stub");
    }

    #[test]
    fn provider_url_selects_http() {
        let config = AppConfig {
            provider_url: Some("http://127.0.0.1:9/api".to_string()),
            ..AppConfig::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "http");
    }
}
