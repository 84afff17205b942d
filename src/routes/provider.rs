//! Stub provider API: serves mock snapshots in the provider wire format.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::snapshot::UserId;
use crate::models::wire::{ProfilePayload, SessionPayload};
use crate::provider::{SnapshotProvider, SnapshotScope};
use crate::AppState;

/// GET /api/user/{id}/gamification — mock snapshot for any user id.
pub async fn user_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfilePayload>, AppError> {
    let user_id = UserId::parse(&id)
        .ok_or_else(|| AppError::Validation("user id must not be blank".to_string()))?;
    let snapshot = state
        .stub
        .get_snapshot(&SnapshotScope::User(user_id.clone()))
        .await?;
    Ok(Json(ProfilePayload::from_snapshot(&user_id, &snapshot)))
}

/// GET /api/user/gamification — mock snapshot for the session user.
pub async fn session_snapshot(
    State(state): State<AppState>,
) -> Result<Json<SessionPayload>, AppError> {
    let snapshot = state.stub.get_snapshot(&SnapshotScope::Session).await?;
    Ok(Json(SessionPayload::from_snapshot(&snapshot)))
}
