pub mod config;
pub mod errors;
pub mod models;
pub mod presentation;
pub mod provider;
pub mod routes;
pub mod viewmodel;

use std::sync::Arc;

use presentation::session::{DashboardSession, ProfileSession, ViewSessions};
use provider::{SnapshotProvider, StubProvider};

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backs the HTML pages; the stub or an external service.
    pub provider: Arc<dyn SnapshotProvider>,
    /// Backs the mock `/api` endpoints.
    pub stub: StubProvider,
    /// Mounted profile and dashboard pages.
    pub profiles: ViewSessions<ProfileSession>,
    pub dashboards: ViewSessions<DashboardSession>,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn from_config(config: config::AppConfig) -> Result<Self, errors::ConfigError> {
        Ok(Self {
            provider: provider::from_config(&config)?,
            stub: StubProvider::with_latency(config.stub_latency()),
            profiles: ViewSessions::new(),
            dashboards: ViewSessions::new(),
            config,
        })
    }
}

/// Bind the configured host and port. The host goes through the resolver,
/// so names such as `localhost` and bare IPv6 addresses such as `::` work.
pub async fn bind_listener(config: &config::AppConfig) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await
}
