//! Route definitions for the gamification service.

pub mod health;
pub mod pages;
pub mod provider;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!(frontend_url = %state.config.frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET])
    .allow_headers(Any);

    let api_routes = Router::new()
        .route("/user/gamification", get(provider::session_snapshot))
        .route("/user/{id}/gamification", get(provider::user_snapshot));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/", get(pages::dashboard))
        .route("/user/{id}/gamification", get(pages::profile))
        .route("/views/profile/{view}/earn-point", post(pages::earn_point))
        .route("/views/profile/{view}/retry", post(pages::retry))
        .route("/views/profile/{view}/toast", post(pages::dismiss_toast))
        .route("/views/dashboard/{view}/drawer", post(pages::toggle_drawer))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::errors::FetchError;
    use crate::models::snapshot::GamificationSnapshot;
    use crate::presentation::session::ViewSessions;
    use crate::provider::{SnapshotProvider, SnapshotScope, StubProvider};

    /// Stub data after a number of failed calls; counts every call.
    struct FlakyProvider {
        failures_left: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FlakyProvider {
        fn failing(times: usize) -> Arc<Self> {
            Arc::new(Self {
                failures_left: AtomicUsize::new(times),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotProvider for FlakyProvider {
        async fn get_snapshot(&self, scope: &SnapshotScope) -> Result<GamificationSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(FetchError::Status(500));
            }
            StubProvider::new().get_snapshot(scope).await
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    fn app_with(provider: Arc<dyn SnapshotProvider>) -> Router {
        build_router(AppState {
            provider,
            stub: StubProvider::new(),
            profiles: ViewSessions::new(),
            dashboards: ViewSessions::new(),
            config: AppConfig::default(),
        })
    }

    fn app() -> Router {
        app_with(Arc::new(StubProvider::new()))
    }

    struct Reply {
        status: StatusCode,
        location: Option<String>,
        body: String,
    }

    async fn send(app: &Router, request: Request<Body>) -> Reply {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(app: &Router, uri: &str) -> Reply {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(app: &Router, uri: &str, form: &str) -> Reply {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn view_id(html: &str) -> String {
        html.split("data-view=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .expect("page carries a view id")
            .to_string()
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let reply = get(&app(), uri).await;
        (reply.status, reply.body)
    }

    #[tokio::test]
    async fn live_probe_returns_ok() {
        let (status, body) = get_body("/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn ready_probe_reports_stub_provider() {
        let (status, body) = get_body("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["provider"], "stub");
        assert_eq!(json["data"]["provider_status"], "connected");
    }

    #[tokio::test]
    async fn stub_profile_endpoint_echoes_id() {
        let (status, body) = get_body("/api/user/42/gamification").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["userId"], "42");
        assert_eq!(json["totalCommandsExecuted"], 42);
        assert_eq!(json["badges"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stub_session_endpoint_uses_session_field_names() {
        let (status, body) = get_body("/api/user/gamification").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["department"], "Engineering");
        assert_eq!(json["totalCommandExecutions"], 156);
        assert!(json.get("userId").is_none());
    }

    #[tokio::test]
    async fn profile_page_renders_snapshot() {
        let (status, body) = get_body("/user/7/gamification").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Jane Doe"));
        assert!(body.contains("Power User"));
        assert!(body.contains("1.2x"));
    }

    #[tokio::test]
    async fn earn_point_form_updates_mounted_view_and_toast() {
        let app = app();
        let page = get(&app, "/user/7/gamification").await;
        let view = view_id(&page.body);
        assert!(page.body.contains("<h3>1234</h3>"));
        assert!(!page.body.contains("+1 point!"));

        let reply = post_form(&app, &format!("/views/profile/{view}/earn-point"), "").await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        let back = reply.location.unwrap();
        assert_eq!(back, format!("/user/7/gamification?view={view}"));

        let page = get(&app, &back).await;
        assert_eq!(view_id(&page.body), view);
        assert!(page.body.contains("<h3>1235</h3>"));
        assert!(page.body.contains("+1 point!"));

        post_form(&app, &format!("/views/profile/{view}/toast"), "reason=click-away").await;
        assert!(get(&app, &back).await.body.contains("+1 point!"));

        post_form(&app, &format!("/views/profile/{view}/toast"), "reason=close-button").await;
        let page = get(&app, &back).await;
        assert!(!page.body.contains("+1 point!"));
        assert!(page.body.contains("<h3>1235</h3>"));
    }

    #[tokio::test]
    async fn retry_form_refetches_once_after_failure() {
        let provider = FlakyProvider::failing(1);
        let app = app_with(provider.clone());

        let page = get(&app, "/user/7/gamification").await;
        assert!(page.body.contains("Failed to load user profile."));
        let view = view_id(&page.body);

        let reply = post_form(&app, &format!("/views/profile/{view}/retry"), "").await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        let page = get(&app, &reply.location.unwrap()).await;
        assert!(page.body.contains("Jane Doe"));
        assert_eq!(provider.calls(), 2);

        // Ready now, so a second retry is refused without a fetch.
        post_form(&app, &format!("/views/profile/{view}/retry"), "").await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn mounted_view_navigates_to_new_user_id() {
        let provider = FlakyProvider::failing(0);
        let app = app_with(provider.clone());

        let view = view_id(&get(&app, "/user/7/gamification").await.body);
        assert_eq!(provider.calls(), 1);

        let page = get(&app, &format!("/user/8/gamification?view={view}")).await;
        assert_eq!(view_id(&page.body), view);
        assert_eq!(provider.calls(), 2);

        get(&app, &format!("/user/8/gamification?view={view}")).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_view_is_not_found() {
        let app = app();
        let missing = uuid::Uuid::new_v4();
        let reply = post_form(&app, &format!("/views/profile/{missing}/earn-point"), "").await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        let reply = post_form(&app, &format!("/views/dashboard/{missing}/drawer"), "").await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dashboard_page_renders_session_user() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Welcome back, Sarah Johnson"));
        assert!(body.contains("Streak Multiplier"));
    }

    #[tokio::test]
    async fn drawer_toggle_keeps_dashboard_snapshot() {
        let provider = FlakyProvider::failing(0);
        let app = app_with(provider.clone());

        let page = get(&app, "/").await;
        assert!(page.body.contains("data-open=\"false\""));
        let view = view_id(&page.body);

        let reply = post_form(&app, &format!("/views/dashboard/{view}/drawer"), "").await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        let page = get(&app, &reply.location.unwrap()).await;
        assert!(page.body.contains("data-open=\"true\""));
        assert_eq!(provider.calls(), 1);
    }
}
