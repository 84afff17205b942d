//! HTML pages driven by the view models.
//!
//! A GET without a known `view` id mounts a fresh view. Form posts act on a
//! mounted view and redirect back to its page.

use std::sync::Arc;
use std::time::Instant;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::snapshot::UserId;
use crate::presentation::pages::{DashboardPage, ProfilePage};
use crate::presentation::session::{DashboardSession, ProfileSession};
use crate::presentation::ui::DismissReason;
use crate::presentation::view::{render_dashboard, render_profile};
use crate::viewmodel::{DashboardController, ProfileController};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub view: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DismissForm {
    pub reason: DismissReason,
}

/// GET /user/{id}/gamification — profile page for one user.
///
/// With the id of a mounted view, the id change goes through
/// `ProfileController::navigate`; the same id again re-renders without a
/// fetch.
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewQuery>,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let user_id = UserId::parse(&id);
    let mounted = query
        .view
        .and_then(|view_id| state.profiles.get(&view_id).map(|view| (view_id, view)));

    let (view_id, view) = match mounted {
        Some((view_id, view)) => {
            let navigation = {
                let mut session = view.lock().await;
                session.set_page_path(uri.path());
                session.controller.navigate(user_id).await
            };
            match navigation {
                Ok(Some(pending)) => {
                    pending.settled().await;
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(view = %view_id, error = %e, "Navigation rejected"),
            }
            (view_id, view)
        }
        None => {
            unmount_idle_views(&state).await;
            let (controller, pending) = ProfileController::mount(
                state.provider.clone(),
                user_id,
                state.config.toast_duration(),
            );
            if let Some(pending) = pending {
                pending.settled().await;
            }
            state.profiles.insert(ProfileSession::new(controller, uri.path()))
        }
    };

    let session = view.lock().await;
    let view_state = session.controller.state().await;
    let page = ProfilePage::new(render_profile(&view_state), view_id, &session.ui, Instant::now());
    Ok(Html(page.render()?))
}

/// POST /views/profile/{view}/earn-point
pub async fn earn_point(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let view = find_view(state.profiles.get(&view_id))?;
    let mut session = view.lock().await;
    match session.controller.earn_point().await {
        Ok(notification) => session.ui.show(&notification, Instant::now()),
        Err(e) => tracing::debug!(view = %view_id, error = %e, "Earn point rejected"),
    }
    Ok(Redirect::to(&session.return_path(&view_id)))
}

/// POST /views/profile/{view}/retry
pub async fn retry(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let view = find_view(state.profiles.get(&view_id))?;
    let session = view.lock().await;
    match session.controller.retry().await {
        Ok(pending) => {
            pending.settled().await;
        }
        Err(e) => tracing::debug!(view = %view_id, error = %e, "Retry rejected"),
    }
    Ok(Redirect::to(&session.return_path(&view_id)))
}

/// POST /views/profile/{view}/toast
pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Form(form): Form<DismissForm>,
) -> Result<Redirect, AppError> {
    let view = find_view(state.profiles.get(&view_id))?;
    let mut session = view.lock().await;
    session.ui.dismiss(form.reason);
    Ok(Redirect::to(&session.return_path(&view_id)))
}

/// GET / — dashboard for the session user.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let mounted = query
        .view
        .and_then(|view_id| state.dashboards.get(&view_id).map(|view| (view_id, view)));

    let (view_id, view) = match mounted {
        Some(found) => found,
        None => {
            unmount_idle_views(&state).await;
            let (controller, pending) = DashboardController::mount(state.provider.clone());
            pending.settled().await;
            state.dashboards.insert(DashboardSession::new(controller))
        }
    };

    let session = view.lock().await;
    let view_state = session.controller.state().await;
    let page = DashboardPage::new(render_dashboard(&view_state), view_id, &session.ui);
    Ok(Html(page.render()?))
}

/// POST /views/dashboard/{view}/drawer
pub async fn toggle_drawer(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let view = find_view(state.dashboards.get(&view_id))?;
    view.lock().await.ui.toggle_drawer();
    Ok(Redirect::to(&DashboardSession::return_path(&view_id)))
}

fn find_view<S>(view: Option<Arc<tokio::sync::Mutex<S>>>) -> Result<Arc<tokio::sync::Mutex<S>>, AppError> {
    view.ok_or_else(|| AppError::NotFound("View has expired, reload the page".to_string()))
}

async fn unmount_idle_views(state: &AppState) {
    let (idle, now) = (state.config.view_idle(), Instant::now());
    for view in state.profiles.purge_idle(idle, now) {
        view.lock().await.controller.unmount().await;
    }
    for view in state.dashboards.purge_idle(idle, now) {
        view.lock().await.controller.unmount().await;
    }
}
