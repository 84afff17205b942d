use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of an external gamification provider. `None` serves the
    /// in-process stub data.
    pub provider_url: Option<String>,
    pub provider_timeout_secs: u64,
    pub stub_latency_ms: u64,
    pub toast_duration_ms: u64,
    /// Mounted page views untouched for this long are unmounted.
    pub view_idle_secs: u64,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_url = match env::var("GAMIFY_PROVIDER_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(validate_provider_url(url.trim())?),
            Err(_) => None,
        };

        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            provider_url,
            provider_timeout_secs: positive_or(env::var("GAMIFY_PROVIDER_TIMEOUT_SECS").ok(), 10),
            stub_latency_ms: env::var("GAMIFY_STUB_LATENCY_MS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),
            toast_duration_ms: env::var("GAMIFY_TOAST_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            view_idle_secs: positive_or(env::var("GAMIFY_VIEW_IDLE_SECS").ok(), 900),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn stub_latency(&self) -> Duration {
        Duration::from_millis(self.stub_latency_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn view_idle(&self) -> Duration {
        Duration::from_secs(self.view_idle_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            provider_url: None,
            provider_timeout_secs: 10,
            stub_latency_ms: 0,
            toast_duration_ms: 3000,
            view_idle_secs: 900,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

/// Zero is as unusable as garbage here: both fall back to the default.
fn positive_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|v: &u64| *v > 0)
        .unwrap_or(default)
}

fn validate_provider_url(url: &str) -> Result<String, ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidProviderUrl(url.to_string()))
    }
}
