use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::services;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub message: &'static str,
}

pub fn like_routes() -> Router<AppState> {
    Router::new().route("/recipes/:id/like", post(toggle_like))
}

pub fn save_routes() -> Router<AppState> {
    Router::new().route("/recipes/:id/save", post(toggle_save))
}

#[instrument(skip(state))]
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let transition = services::toggle_like(&state, id, user_id).await?;
    Ok(Json(ToggleResponse {
        message: transition.like_message(),
    }))
}

#[instrument(skip(state))]
pub async fn toggle_save(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let transition = services::toggle_save(&state, id, user_id).await?;
    Ok(Json(ToggleResponse {
        message: transition.save_message(),
    }))
}
